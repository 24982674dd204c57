use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("runtime id cannot be empty")]
    EmptyRuntimeId,

    #[error("invalid timeout: {0} (expected a duration such as \"300s\" or \"5m0s\")")]
    InvalidTimeout(String),

    #[error("invalid config tree: {0}")]
    InvalidTree(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
