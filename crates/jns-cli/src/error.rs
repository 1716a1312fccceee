#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("prompt failed: {0}")]
    Prompt(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] jns_config::ConfigError),
    #[error(transparent)]
    Api(#[from] jns_api::ApiError),
    #[error(transparent)]
    Runner(#[from] jns_runner::RunnerError),
    #[error(transparent)]
    Ai(#[from] jns_ai::AiError),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) | CliError::Prompt(_) => 2,
            CliError::Config(_) | CliError::Io { .. } => 3,
            CliError::Api(_) => 4,
            CliError::Runner(_) => 5,
            CliError::Ai(_) => 6,
        }
    }
}
