use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rtm_exec::{CommandRunner, HelmCli, is_release_missing};
use rtm_model::{ConfigTree, RuntimeId};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    error::{ConfigError, OperationError},
    release::ReleaseInspector,
};

/// [`ReleaseInspector`] backed by `helm get values -o json`.
pub struct HelmInspector {
    helm: HelmCli,
    runner: Arc<dyn CommandRunner>,
}

impl HelmInspector {
    pub fn new(helm: HelmCli, runner: Arc<dyn CommandRunner>) -> Self {
        Self { helm, runner }
    }
}

#[async_trait]
impl ReleaseInspector for HelmInspector {
    async fn current_values(
        &self,
        id: &RuntimeId,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ConfigTree, OperationError> {
        let release = id.release_name();
        let spec = self.helm.get_values(&release, timeout);
        debug!(%release, "reading release values");

        let output = self.runner.run(&spec, cancel).await?;
        if !output.success() && is_release_missing(&output.stderr_lossy()) {
            return Err(OperationError::NotFound(release.to_string()));
        }
        let output = output.into_result(&spec.program)?;

        ConfigTree::from_json_slice(&output.stdout)
            .map_err(|e| ConfigError::InvalidValues(e.to_string()).into())
    }
}
