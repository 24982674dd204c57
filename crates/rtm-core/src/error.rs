use rtm_exec::ExecError;
use thiserror::Error;

/// Missing or malformed configuration: release values, flattened paths, identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid key {key:?} under '{path}': keys must be non-empty and contain none of . [ ] = , \\")]
    InvalidKey { path: String, key: String },

    #[error("a {kind} value needs a non-empty path")]
    UnnamedValue { kind: &'static str },

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be a {expected}, got {actual}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unreadable release values: {0}")]
    InvalidValues(String),
}

/// Failure of one runtime operation.
///
/// Never aborts a batch: the orchestrator downgrades it to a `false` outcome.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("release not found: {0}")]
    NotFound(String),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecError),
}

impl OperationError {
    /// Bounded label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::NotFound(_) => "not_found",
            OperationError::Config(_) => "config_error",
            OperationError::Execution(ExecError::Timeout { .. }) => "timeout",
            OperationError::Execution(ExecError::Canceled) => "canceled",
            OperationError::Execution(_) => "execution_error",
        }
    }
}

/// Failure of a read-only cluster query.
#[derive(Debug, Error)]
pub enum ClusterQueryError {
    #[error("invalid selector input: {0}")]
    InvalidSelector(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("pod not found: {namespace}/{name}")]
    NotFound { namespace: String, name: String },

    #[error("cluster api error: {0}")]
    Api(String),
}
