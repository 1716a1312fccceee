use std::time::Duration;

use console::Style;

use crate::CheckError;

/// Error raised while producing the in-flight lines of a progress bar,
/// e.g. when refreshing stage data over the network. The render loop
/// backs off and retries; it never aborts the operation.
#[derive(Debug, thiserror::Error)]
#[error("failed to refresh progress data: {0}")]
pub struct ProgressError(pub CheckError);

/// Pluggable strategy for the lines shown while an operation is in
/// flight, on success, and on failure.
///
/// `running` is invoked on every tick of the render loop and must stay
/// cheap; implementations may memoize derived data internally.
/// `completed` and `failed` are each invoked at most once, after the
/// poll loop has reached a terminal state. An empty line list means
/// "leave no terminal line behind".
pub trait ProgressBar: Send {
    fn running(&mut self) -> Result<Vec<String>, ProgressError>;

    fn completed(&mut self) -> Vec<String>;

    fn failed(&mut self) -> Vec<String>;

    /// Cadence at which `running` should be invoked.
    fn refresh_interval(&self) -> Duration;
}

const SPINNER_GLYPHS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Single-line spinner cycling through braille glyphs, one glyph per
/// render tick.
pub struct Spinner {
    running_message: String,
    complete_message: Option<String>,
    error_message: Option<String>,
    spin_counter: usize,
}

impl Spinner {
    pub fn new(running_message: impl Into<String>) -> Self {
        Self {
            running_message: running_message.into(),
            complete_message: None,
            error_message: None,
            spin_counter: 0,
        }
    }

    /// Line printed after the operation succeeds.
    pub fn complete_message(mut self, message: impl Into<String>) -> Self {
        self.complete_message = Some(message.into());
        self
    }

    /// Line printed after the operation fails or times out.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

impl ProgressBar for Spinner {
    fn running(&mut self) -> Result<Vec<String>, ProgressError> {
        let glyph = SPINNER_GLYPHS[self.spin_counter];
        self.spin_counter = (self.spin_counter + 1) % SPINNER_GLYPHS.len();
        Ok(vec![format!("{glyph} {}", self.running_message)])
    }

    fn completed(&mut self) -> Vec<String> {
        match &self.complete_message {
            Some(message) => vec![format!(
                "{} {message}",
                Style::new().green().bold().apply_to('\u{2714}')
            )],
            None => Vec::new(),
        }
    }

    fn failed(&mut self) -> Vec<String> {
        match &self.error_message {
            Some(message) => vec![format!(
                "{} {message}",
                Style::new().red().bold().apply_to('\u{2718}')
            )],
            None => Vec::new(),
        }
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_millis(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_line(lines: Vec<String>) -> String {
        assert_eq!(lines.len(), 1);
        lines.into_iter().next().unwrap()
    }

    #[test]
    fn spinner_advances_one_glyph_per_call() {
        let mut spinner = Spinner::new("working");
        let first = only_line(spinner.running().unwrap());
        let second = only_line(spinner.running().unwrap());
        assert_ne!(first, second);
        assert!(first.ends_with("working"));
    }

    #[test]
    fn spinner_wraps_around_the_glyph_set() {
        let mut spinner = Spinner::new("working");
        let first = only_line(spinner.running().unwrap());
        for _ in 0..SPINNER_GLYPHS.len() - 1 {
            spinner.running().unwrap();
        }
        let wrapped = only_line(spinner.running().unwrap());
        assert_eq!(first, wrapped);
    }

    #[test]
    fn terminal_lines_are_empty_unless_configured() {
        let mut spinner = Spinner::new("working");
        assert!(spinner.completed().is_empty());
        assert!(spinner.failed().is_empty());
    }

    #[test]
    fn terminal_lines_carry_configured_messages() {
        let mut spinner = Spinner::new("working")
            .complete_message("done")
            .error_message("broken");
        assert!(only_line(spinner.completed()).contains("done"));
        assert!(only_line(spinner.failed()).contains("broken"));
    }
}
