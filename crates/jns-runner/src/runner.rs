use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::params::CommandParameters;
use crate::progress::ProgressBar;
use crate::render::{MultilineRenderer, TerminalSink};
use crate::{CheckError, Outcome};

/// Consecutive failures tolerated by either loop before giving up.
const MAX_CONSECUTIVE_FAILURES: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The triggering action itself failed. Never reported as a poll
    /// `Failure`; the operation may not have started at all.
    #[error("command action failed: {0}")]
    Action(#[source] CheckError),

    /// The completion checker kept failing. The operation may still be
    /// running on the server.
    #[error("failed to check operation completion; check the build status on the job page")]
    CheckerExhausted,

    /// The render thread panicked and the terminal state is unknown.
    #[error("progress rendering thread panicked")]
    RenderPanicked,
}

/// Runs a side-effecting action, keeps a progress bar drawn from a
/// background render thread, and polls a completion checker until
/// success, failure, or timeout.
///
/// While polling, the render thread owns the progress bar and the
/// renderer. Every terminal transition first cancels that thread and
/// joins it, moving both back to the poll loop, so the final lines can
/// never interleave with an in-flight running render.
pub struct CommandRunner {
    renderer: Option<MultilineRenderer>,
}

impl CommandRunner {
    pub fn new(sink: Box<dyn TerminalSink>) -> Self {
        Self {
            renderer: Some(MultilineRenderer::new(sink)),
        }
    }

    /// Equivalent to `run` with a no-op action: only observe an
    /// operation that is already in flight.
    pub fn show_progress<C>(
        &mut self,
        parameters: CommandParameters<'_, C>,
    ) -> Result<Outcome<C>, RunnerError> {
        self.run(|| Ok(()), parameters)
    }

    pub fn run<C>(
        &mut self,
        action: impl FnOnce() -> Result<(), CheckError>,
        parameters: CommandParameters<'_, C>,
    ) -> Result<Outcome<C>, RunnerError> {
        let CommandParameters {
            progress_bar,
            mut completion_checker,
            success_when,
            failure_when,
            on_success,
            on_failure,
            timeout,
            timeout_message,
            poll_interval,
        } = parameters;

        let backoff = Arc::new(AtomicU64::new(1));
        let renderer = self.renderer.take().ok_or(RunnerError::RenderPanicked)?;
        let render = RenderTask::spawn(progress_bar, renderer, Arc::clone(&backoff));

        if let Err(err) = action() {
            let (_, renderer) = render.stop()?;
            self.restore(renderer);
            return Err(RunnerError::Action(err));
        }

        let deadline = timeout.map(|t| Instant::now() + t);
        let mut consecutive_failures = 0u32;

        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                let (mut bar, mut renderer) = render.stop()?;
                render_terminal(&mut renderer, &bar.failed(), &timeout_message());
                self.restore(renderer);
                return Ok(Outcome::Failure(None));
            }

            match completion_checker() {
                Ok(snapshot) => {
                    consecutive_failures = 0;
                    if success_when(&snapshot) {
                        let (mut bar, mut renderer) = render.stop()?;
                        render_terminal(&mut renderer, &bar.completed(), &on_success(&snapshot));
                        self.restore(renderer);
                        return Ok(Outcome::Success(snapshot));
                    }
                    if failure_when(&snapshot) {
                        let (mut bar, mut renderer) = render.stop()?;
                        render_terminal(&mut renderer, &bar.failed(), &on_failure(&snapshot));
                        self.restore(renderer);
                        return Ok(Outcome::Failure(Some(snapshot)));
                    }
                }
                Err(err) => {
                    double(&backoff);
                    consecutive_failures += 1;
                    warn!(
                        error = %err,
                        failures = consecutive_failures,
                        "completion check failed"
                    );
                    if consecutive_failures > MAX_CONSECUTIVE_FAILURES {
                        let (mut bar, mut renderer) = render.stop()?;
                        render_terminal(&mut renderer, &bar.failed(), "");
                        self.restore(renderer);
                        return Err(RunnerError::CheckerExhausted);
                    }
                }
            }

            thread::sleep(scaled(poll_interval, &backoff));
        }
    }

    /// Leave the renderer with nothing pending to erase so the next
    /// command starts from a clean slate.
    fn restore(&mut self, mut renderer: MultilineRenderer) {
        renderer.reset();
        self.renderer = Some(renderer);
    }
}

/// Erase the last running render, write the terminal-state lines, then
/// the result message below them. Terminal I/O failures at this point
/// are logged and swallowed; the outcome is already decided.
fn render_terminal(renderer: &mut MultilineRenderer, bar_lines: &[String], message: &str) {
    if let Err(err) = renderer.render(bar_lines) {
        warn!(error = %err, "terminal-state render failed");
    }
    renderer.reset();
    if !message.is_empty()
        && let Err(err) = renderer.render_text(message)
    {
        warn!(error = %err, "result message render failed");
    }
}

/// Background thread drawing `running()` at the bar's refresh cadence.
/// Owns the progress bar and the renderer until cancelled.
struct RenderTask {
    cancel: Sender<()>,
    handle: JoinHandle<(Box<dyn ProgressBar>, MultilineRenderer)>,
}

impl RenderTask {
    fn spawn(
        mut bar: Box<dyn ProgressBar>,
        mut renderer: MultilineRenderer,
        backoff: Arc<AtomicU64>,
    ) -> Self {
        let (cancel, cancelled) = mpsc::channel();
        let handle = thread::spawn(move || {
            render_loop(bar.as_mut(), &mut renderer, &cancelled, &backoff);
            (bar, renderer)
        });
        Self { cancel, handle }
    }

    /// Cancel the render loop and take back the progress bar and the
    /// renderer. Blocks until the thread has exited, so the caller owns
    /// the terminal afterwards.
    fn stop(self) -> Result<(Box<dyn ProgressBar>, MultilineRenderer), RunnerError> {
        let _ = self.cancel.send(());
        self.handle.join().map_err(|_| RunnerError::RenderPanicked)
    }
}

fn render_loop(
    bar: &mut dyn ProgressBar,
    renderer: &mut MultilineRenderer,
    cancelled: &Receiver<()>,
    backoff: &AtomicU64,
) {
    let mut consecutive_failures = 0u32;
    loop {
        match cancelled.recv_timeout(scaled(bar.refresh_interval(), backoff)) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {}
        }
        let tick = match bar.running() {
            Ok(lines) => renderer.render(&lines).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match tick {
            Ok(()) => consecutive_failures = 0,
            Err(reason) => {
                double(backoff);
                consecutive_failures += 1;
                warn!(%reason, failures = consecutive_failures, "progress render tick failed");
                if consecutive_failures > MAX_CONSECUTIVE_FAILURES {
                    // Give up on the display; polling continues without it.
                    return;
                }
            }
        }
    }
}

fn scaled(base: Duration, backoff: &AtomicU64) -> Duration {
    let factor = backoff.load(Ordering::Relaxed).min(u64::from(u32::MAX)) as u32;
    base.saturating_mul(factor)
}

fn double(backoff: &AtomicU64) {
    let _ = backoff.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |factor| {
        Some(factor.saturating_mul(2))
    });
}
