/// Terminal result of a polled operation.
///
/// `Failure` is the expected non-completion path: the failure predicate
/// matched, or the timeout elapsed (the latter carries no snapshot).
/// Unexpected conditions are `RunnerError`s, never an `Outcome`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<C> {
    Success(C),
    Failure(Option<C>),
}

impl<C> Outcome<C> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The checker snapshot that produced this outcome, if any.
    pub fn value(&self) -> Option<&C> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(value) => value.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_value() {
        let outcome = Outcome::Success(42);
        assert!(outcome.is_success());
        assert_eq!(outcome.value(), Some(&42));
    }

    #[test]
    fn timeout_failure_has_no_value() {
        let outcome: Outcome<i32> = Outcome::Failure(None);
        assert!(outcome.is_failure());
        assert_eq!(outcome.value(), None);
    }

    #[test]
    fn predicate_failure_keeps_snapshot() {
        let outcome = Outcome::Failure(Some("aborted"));
        assert_eq!(outcome.value(), Some(&"aborted"));
    }
}
