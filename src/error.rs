use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Operation not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised while loading and rendering a model catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid environment variable value: {0}")]
    InvalidEnvVar(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Tree error: {0}")]
    TreeError(#[from] TreeError),
}
