use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdoLensError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Cannot reach {0} (offline or unreachable)")]
    Offline(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AdoLensError>;
