use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the status store and the API mapped over it.
///
/// The display strings double as the `error` field of the JSON bodies the
/// backend returns, so clients can match on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid payload")]
    InvalidPayload,

    #[error("Not found")]
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum GymSyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}
