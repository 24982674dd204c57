use thiserror::Error;

/// Failure to set up cluster access.
#[derive(Debug, Error)]
pub enum KubeSourceError {
    #[error("cannot load kubeconfig {path}: {reason}")]
    Kubeconfig { path: String, reason: String },

    #[error("cannot build kubernetes client: {0}")]
    Client(#[from] kube::Error),
}
