//! Wire types of the HTTP API.
use rtm_model::{BatchMode, BatchResult, HelmTimeout, OwnerFilter};
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// Body of `POST /restart` and `POST /delete`. Missing fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchRequest {
    pub runtime_ids: Vec<String>,
    pub concurrent: bool,
    /// Go-style duration passed to helm; empty means the default.
    pub timeout: String,
}

/// Validated batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCommand {
    pub runtime_ids: Vec<String>,
    pub mode: BatchMode,
    pub timeout: HelmTimeout,
}

impl TryFrom<BatchRequest> for BatchCommand {
    type Error = ApiError;

    fn try_from(req: BatchRequest) -> Result<Self, Self::Error> {
        let timeout =
            HelmTimeout::parse(&req.timeout).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(Self {
            runtime_ids: req.runtime_ids,
            mode: BatchMode::from(req.concurrent),
            timeout,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartResponse {
    pub restarted: BatchResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub stopped: BatchResult,
}

/// Body of `POST /pods`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PodListRequest {
    pub users: Vec<String>,
    pub namespace: String,
    /// Page size; `0` means no limit.
    pub limit: i64,
    #[serde(rename = "continue")]
    pub continuation: String,
}

impl PodListRequest {
    pub fn owner_filter(&self) -> OwnerFilter {
        OwnerFilter::users(self.users.iter().cloned())
    }
}

/// Body of `POST /pods/byName`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PodByNameRequest {
    pub name: String,
    pub namespace: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn batch_request_uses_camel_case_and_defaults() {
        let req: BatchRequest = serde_json::from_str(r#"{"runtimeIds": ["a", "b"]}"#).unwrap();
        let cmd = BatchCommand::try_from(req).unwrap();
        assert_eq!(cmd.runtime_ids, ["a", "b"]);
        assert_eq!(cmd.mode, BatchMode::Sequential);
        assert_eq!(cmd.timeout, HelmTimeout::default());
    }

    #[test]
    fn batch_request_parses_timeout_and_mode() {
        let req: BatchRequest =
            serde_json::from_str(r#"{"runtimeIds": [], "concurrent": true, "timeout": "90s"}"#)
                .unwrap();
        let cmd = BatchCommand::try_from(req).unwrap();
        assert_eq!(cmd.mode, BatchMode::Concurrent);
        assert_eq!(cmd.timeout.duration(), Duration::from_secs(90));
    }

    #[test]
    fn invalid_timeout_is_bad_request() {
        let req = BatchRequest {
            timeout: "soon".into(),
            ..Default::default()
        };
        assert!(matches!(BatchCommand::try_from(req), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn pod_list_request_reads_continue() {
        let raw = r#"{"users": ["alice"], "limit": 10, "continue": "tok"}"#;
        let req: PodListRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.continuation, "tok");
        assert_eq!(req.namespace, "");
        assert_eq!(req.owner_filter().owners(), ["alice"]);
    }
}
