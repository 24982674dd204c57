use std::path::Path;

use kube::{
    Client, Config,
    config::{KubeConfigOptions, Kubeconfig},
};
use tracing::info;

use crate::KubeSourceError;

/// Build a client for the cluster.
///
/// With `kubeconfig` set, those files are used (current context). The value may
/// be an OS path list like `KUBECONFIG`. Without it, kube's default inference
/// applies: `KUBECONFIG`, then `~/.kube/config`, then the in-cluster service
/// account.
pub async fn connect(kubeconfig: Option<&Path>) -> Result<Client, KubeSourceError> {
    let Some(path) = kubeconfig else {
        info!("using default kubernetes client configuration");
        return Ok(Client::try_default().await?);
    };

    let raw = read_kubeconfig(path)?;
    let config = Config::from_custom_kubeconfig(raw, &KubeConfigOptions::default())
        .await
        .map_err(|e| kubeconfig_error(path, e))?;

    info!(kubeconfig = %path.display(), cluster = %config.cluster_url, "using kubeconfig");
    Ok(Client::try_from(config)?)
}

/// Read every file of a path list and merge them; earlier files win.
pub(crate) fn read_kubeconfig(paths: &Path) -> Result<Kubeconfig, KubeSourceError> {
    let mut merged: Option<Kubeconfig> = None;
    for file in std::env::split_paths(paths.as_os_str()) {
        if file.as_os_str().is_empty() {
            continue;
        }
        let next = Kubeconfig::read_from(&file).map_err(|e| kubeconfig_error(&file, e))?;
        merged = Some(match merged {
            Some(acc) => acc.merge(next).map_err(|e| kubeconfig_error(&file, e))?,
            None => next,
        });
    }
    merged.ok_or_else(|| kubeconfig_error(paths, "no kubeconfig file in path list"))
}

fn kubeconfig_error(path: &Path, reason: impl ToString) -> KubeSourceError {
    KubeSourceError::Kubeconfig {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
