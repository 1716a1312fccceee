use std::io;

use console::Term;

/// Destination for rendered lines, with the ability to erase the block
/// of lines written last (ANSI cursor-up + clear, or a test fake).
pub trait TerminalSink: Send {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn erase_last_lines(&mut self, n: usize) -> io::Result<()>;
}

/// ANSI terminal sink backed by `console::Term`.
pub struct AnsiTerminal {
    term: Term,
}

impl AnsiTerminal {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl TerminalSink for AnsiTerminal {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.term.write_line(line)
    }

    fn erase_last_lines(&mut self, n: usize) -> io::Result<()> {
        self.term.clear_last_lines(n)
    }
}

/// Stateful writer that redraws the block of lines written by the
/// previous call in place.
///
/// Not safe for concurrent use. The runner guarantees a single owner at
/// any point in time: the render thread while the operation is in
/// flight, the poll loop afterwards.
pub struct MultilineRenderer {
    sink: Box<dyn TerminalSink>,
    lines_to_erase: usize,
}

impl MultilineRenderer {
    pub fn new(sink: Box<dyn TerminalSink>) -> Self {
        Self {
            sink,
            lines_to_erase: 0,
        }
    }

    /// Erase the previously rendered block, then write `lines`.
    pub fn render(&mut self, lines: &[String]) -> io::Result<()> {
        if self.lines_to_erase > 0 {
            self.sink.erase_last_lines(self.lines_to_erase)?;
        }
        self.lines_to_erase = lines.len();
        for line in lines {
            self.sink.write_line(line)?;
        }
        Ok(())
    }

    /// Render a message, one terminal line per text line.
    pub fn render_text(&mut self, text: &str) -> io::Result<()> {
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();
        self.render(&lines)
    }

    /// Forget the previously rendered block so the next `render` call
    /// erases nothing. Does not touch the terminal.
    pub fn reset(&mut self) {
        self.lines_to_erase = 0;
    }
}

#[cfg(test)]
pub(crate) mod test_sink {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::TerminalSink;

    /// In-memory terminal model: a shared screen plus an operation log.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub screen: Arc<Mutex<Vec<String>>>,
        pub written: Arc<Mutex<Vec<String>>>,
    }

    impl TerminalSink for RecordingSink {
        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.screen.lock().unwrap().push(line.to_string());
            self.written.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn erase_last_lines(&mut self, n: usize) -> io::Result<()> {
            let mut screen = self.screen.lock().unwrap();
            let keep = screen.len().saturating_sub(n);
            screen.truncate(keep);
            Ok(())
        }
    }

    /// Sink whose writes always fail, for exercising render backoff.
    pub struct BrokenSink;

    impl TerminalSink for BrokenSink {
        fn write_line(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::other("terminal gone"))
        }

        fn erase_last_lines(&mut self, _n: usize) -> io::Result<()> {
            Err(io::Error::other("terminal gone"))
        }
    }
}
