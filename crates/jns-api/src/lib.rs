mod client;
pub mod model;
mod pipeline;

pub use client::{JenkinsClient, ProgressiveConsoleText, QueueItemLocation};
pub use pipeline::PipelineClient;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("failed to parse Jenkins response: {0}")]
    Parse(String),
    #[error("build was triggered but the queue location header is missing")]
    MissingQueueLocation,
}

/// Join a base URL and a path segment with exactly one slash.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::join;

    #[test]
    fn join_normalizes_slashes() {
        assert_eq!(join("http://j/", "/api/json"), "http://j/api/json");
        assert_eq!(join("http://j", "api/json"), "http://j/api/json");
    }
}
