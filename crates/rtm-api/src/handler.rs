use async_trait::async_trait;
use rtm_model::{BatchResult, PodDetail, PodPage};

use crate::{ApiError, BatchCommand, PodByNameRequest, PodListRequest};

/// Backend of the HTTP API.
///
/// [`crate::RuntimeApiAdapter`] is the production implementation; tests and
/// embedders can provide their own.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Restart every runtime of the command; per-id failures are `false` entries.
    async fn restart(&self, cmd: BatchCommand) -> Result<BatchResult, ApiError>;

    /// Uninstall every runtime of the command.
    async fn delete(&self, cmd: BatchCommand) -> Result<BatchResult, ApiError>;

    async fn list_pods(&self, req: PodListRequest) -> Result<PodPage, ApiError>;

    async fn get_pod(&self, req: PodByNameRequest) -> Result<PodDetail, ApiError>;
}
