use std::time::Duration;

use crate::CheckError;
use crate::progress::ProgressBar;

pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub(crate) type Checker<'a, C> = Box<dyn FnMut() -> Result<C, CheckError> + 'a>;
pub(crate) type Predicate<'a, C> = Box<dyn Fn(&C) -> bool + 'a>;
pub(crate) type MessageFn<'a, C> = Box<dyn Fn(&C) -> String + 'a>;

/// Configuration for one `CommandRunner` invocation: the progress bar
/// to draw, the completion checker to poll, the predicates deciding
/// success and failure, the messages to print, and the timeout policy.
///
/// Built once per command, consumed by exactly one `run` call.
pub struct CommandParameters<'a, C> {
    pub(crate) progress_bar: Box<dyn ProgressBar>,
    pub(crate) completion_checker: Checker<'a, C>,
    pub(crate) success_when: Predicate<'a, C>,
    pub(crate) failure_when: Predicate<'a, C>,
    pub(crate) on_success: MessageFn<'a, C>,
    pub(crate) on_failure: MessageFn<'a, C>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) timeout_message: Box<dyn Fn() -> String + 'a>,
    pub(crate) poll_interval: Duration,
}

impl<'a, C> CommandParameters<'a, C> {
    /// Defaults: success on the first check, no failure predicate, no
    /// messages, no timeout, 5 s poll interval.
    pub fn new(
        progress_bar: impl ProgressBar + 'static,
        completion_checker: impl FnMut() -> Result<C, CheckError> + 'a,
    ) -> Self {
        Self {
            progress_bar: Box::new(progress_bar),
            completion_checker: Box::new(completion_checker),
            success_when: Box::new(|_| true),
            failure_when: Box::new(|_| false),
            on_success: Box::new(|_| String::new()),
            on_failure: Box::new(|_| String::new()),
            timeout: None,
            timeout_message: Box::new(|| "Operation timed out".to_string()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Predicate deciding the operation completed successfully. Checked
    /// before `failure_when` on every tick, so success wins a tie.
    pub fn success_when(mut self, predicate: impl Fn(&C) -> bool + 'a) -> Self {
        self.success_when = Box::new(predicate);
        self
    }

    pub fn failure_when(mut self, predicate: impl Fn(&C) -> bool + 'a) -> Self {
        self.failure_when = Box::new(predicate);
        self
    }

    /// Message rendered after the success lines; empty means none.
    pub fn on_success(mut self, message: impl Fn(&C) -> String + 'a) -> Self {
        self.on_success = Box::new(message);
        self
    }

    /// Message rendered after the failure lines; empty means none.
    pub fn on_failure(mut self, message: impl Fn(&C) -> String + 'a) -> Self {
        self.on_failure = Box::new(message);
        self
    }

    /// Deadline for the whole polling loop. Unset means poll forever.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout_message(mut self, message: impl Fn() -> String + 'a) -> Self {
        self.timeout_message = Box::new(message);
        self
    }

    /// Pause between completion checks. Production call sites keep the
    /// default; tests shrink it to run in milliseconds.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
