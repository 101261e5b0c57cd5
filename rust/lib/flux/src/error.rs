use thiserror::Error;

#[derive(Error, Debug)]
pub enum FluxError {
    /// JSON ingress could not decode the payload into an action.
    #[error("invalid action: {0}")]
    InvalidAction(#[from] serde_json::Error),

    #[error("invalid subscription pattern: {0}")]
    InvalidPattern(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
