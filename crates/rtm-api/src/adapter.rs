use std::sync::Arc;

use async_trait::async_trait;
use rtm_core::{BatchOrchestrator, PodQueryService};
use rtm_model::{BatchResult, Operation, PodDetail, PodPage};

use crate::{ApiError, ApiHandler, BatchCommand, PodByNameRequest, PodListRequest};

/// [`ApiHandler`] delegating to the batch orchestrator and the pod query service.
pub struct RuntimeApiAdapter {
    batches: Arc<BatchOrchestrator>,
    pods: Arc<PodQueryService>,
}

impl RuntimeApiAdapter {
    pub fn new(batches: Arc<BatchOrchestrator>, pods: Arc<PodQueryService>) -> Self {
        Self { batches, pods }
    }

    async fn run(&self, cmd: BatchCommand, op: Operation) -> BatchResult {
        self.batches
            .run_batch(&cmd.runtime_ids, cmd.mode, op, &cmd.timeout)
            .await
    }
}

#[async_trait]
impl ApiHandler for RuntimeApiAdapter {
    async fn restart(&self, cmd: BatchCommand) -> Result<BatchResult, ApiError> {
        Ok(self.run(cmd, Operation::Restart).await)
    }

    async fn delete(&self, cmd: BatchCommand) -> Result<BatchResult, ApiError> {
        Ok(self.run(cmd, Operation::Delete).await)
    }

    async fn list_pods(&self, req: PodListRequest) -> Result<PodPage, ApiError> {
        Ok(self
            .pods
            .list_pods(&req.owner_filter(), &req.namespace, req.limit, &req.continuation)
            .await?)
    }

    async fn get_pod(&self, req: PodByNameRequest) -> Result<PodDetail, ApiError> {
        Ok(self.pods.get_pod(&req.namespace, &req.name).await?)
    }
}
