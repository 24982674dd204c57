//! Read access to the deployed values of a runtime's release.
mod helm;
pub use helm::HelmInspector;

use std::time::Duration;

use async_trait::async_trait;
use rtm_model::{ConfigTree, RuntimeId};
use tokio_util::sync::CancellationToken;

use crate::error::OperationError;

/// Source of the currently deployed values of `rt-<id>`.
#[async_trait]
pub trait ReleaseInspector: Send + Sync + 'static {
    /// Fetch the user-supplied values of the runtime's release.
    ///
    /// Returns [`OperationError::NotFound`] when the release does not exist.
    async fn current_values(
        &self,
        id: &RuntimeId,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ConfigTree, OperationError>;
}
