use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::{
    ApiError, ApiHandler, BatchCommand, BatchRequest, DeleteResponse, PodByNameRequest,
    PodListRequest, RestartResponse,
};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build the axum router.
    ///
    /// Routes:
    /// - POST /restart     - restart runtimes
    /// - POST /delete      - uninstall runtimes
    /// - POST /pods        - list runtime pods
    /// - POST /pods/byName - fetch one pod
    /// - GET  /healthz     - liveness
    pub fn router(self) -> Router {
        Router::new()
            .route("/restart", post(restart::<H>))
            .route("/delete", post(delete::<H>))
            .route("/pods", post(list_pods::<H>))
            .route("/pods/byName", post(get_pod::<H>))
            .route("/healthz", get(healthz))
            .with_state(self.handler)
    }
}

/// Decode a JSON body; any malformed input is a `400`.
///
/// Bodies are read as raw bytes so that a missing or wrong content type is
/// reported the same way as invalid JSON.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("malformed body: {e}")))
}

fn batch_command(body: &Bytes) -> Result<BatchCommand, ApiError> {
    BatchCommand::try_from(parse_body::<BatchRequest>(body)?)
}

/// POST /restart
async fn restart<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let cmd = batch_command(&body)?;
    debug!(ids = cmd.runtime_ids.len(), mode = %cmd.mode, "restart requested");
    let restarted = handler.restart(cmd).await?;
    Ok(Json(RestartResponse { restarted }))
}

/// POST /delete
async fn delete<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let cmd = batch_command(&body)?;
    debug!(ids = cmd.runtime_ids.len(), mode = %cmd.mode, "delete requested");
    let stopped = handler.delete(cmd).await?;
    Ok(Json(DeleteResponse { stopped }))
}

/// POST /pods
async fn list_pods<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let req: PodListRequest = parse_body(&body)?;
    Ok(Json(handler.list_pods(req).await?))
}

/// POST /pods/byName
async fn get_pod<H>(
    State(handler): State<Arc<H>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let req: PodByNameRequest = parse_body(&body)?;
    Ok(Json(handler.get_pod(req).await?))
}

/// GET /healthz
async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeApiAdapter;
    use async_trait::async_trait;
    use axum::{
        body::to_bytes,
        http::{StatusCode, header::CONTENT_TYPE},
        response::Response,
    };
    use rtm_core::{
        BatchConfig, BatchOrchestrator, ClusterQueryError, OperationError, PodListQuery,
        PodQueryService, PodSource, RuntimeOperator,
    };
    use rtm_model::{HelmTimeout, PodDetail, PodPage, PodRecord, RuntimeId};
    use serde_json::Value;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    /// Operator that fails for ids listed as missing.
    struct FakeOperator {
        missing: Vec<&'static str>,
    }

    impl FakeOperator {
        fn outcome(&self, id: &RuntimeId) -> Result<(), OperationError> {
            if self.missing.iter().any(|m| *m == id.as_str()) {
                return Err(OperationError::NotFound(id.release_name().to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RuntimeOperator for FakeOperator {
        async fn restart(
            &self,
            id: &RuntimeId,
            _: &HelmTimeout,
            _: &CancellationToken,
        ) -> Result<(), OperationError> {
            self.outcome(id)
        }

        async fn delete(
            &self,
            id: &RuntimeId,
            _: &HelmTimeout,
            _: &CancellationToken,
        ) -> Result<(), OperationError> {
            self.outcome(id)
        }
    }

    #[derive(Default)]
    struct FakePods {
        selectors: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PodSource for FakePods {
        async fn list(&self, query: &PodListQuery) -> Result<PodPage, ClusterQueryError> {
            self.selectors.lock().unwrap().push(query.selector.clone());
            if query.namespace.as_deref() == Some("broken") {
                return Err(ClusterQueryError::Api("connection refused".into()));
            }
            Ok(PodPage {
                records: vec![PodRecord {
                    name: "rt-a-0".into(),
                    phase: "Running".into(),
                    ..Default::default()
                }],
                continuation_token: "next".into(),
            })
        }

        async fn get(&self, namespace: &str, name: &str) -> Result<PodDetail, ClusterQueryError> {
            if name == "rt-a-0" {
                return Ok(PodDetail {
                    record: PodRecord {
                        name: name.into(),
                        namespace: namespace.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                });
            }
            Err(ClusterQueryError::NotFound {
                namespace: namespace.into(),
                name: name.into(),
            })
        }
    }

    fn adapter(missing: Vec<&'static str>) -> (Arc<RuntimeApiAdapter>, Arc<FakePods>) {
        let batches = BatchOrchestrator::new(
            Arc::new(FakeOperator { missing }),
            BatchConfig::default(),
        );
        let pods = Arc::new(FakePods::default());
        let adapter = RuntimeApiAdapter::new(
            Arc::new(batches),
            Arc::new(PodQueryService::new(pods.clone())),
        );
        (Arc::new(adapter), pods)
    }

    async fn read(resp: Response) -> (StatusCode, Value) {
        let status = resp.status();
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn respond<R: IntoResponse>(res: Result<R, ApiError>) -> (StatusCode, Value) {
        read(res.into_response()).await
    }

    #[tokio::test]
    async fn concurrent_restart_reports_each_runtime() {
        let (handler, _) = adapter(vec!["b"]);
        let body = Bytes::from(r#"{"runtimeIds": ["a", "b", "c"], "concurrent": true}"#);

        let (status, json) = respond(restart(State(handler), body).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"restarted": {"a": true, "b": false, "c": true}}));
    }

    #[tokio::test]
    async fn delete_uses_stopped_envelope() {
        let (handler, _) = adapter(vec![]);
        let body = Bytes::from(r#"{"runtimeIds": ["x"], "timeout": "30s"}"#);

        let (status, json) = respond(delete(State(handler), body).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"stopped": {"x": true}}));
    }

    #[tokio::test]
    async fn malformed_batch_body_is_bad_request() {
        for raw in ["", "{", r#"{"runtimeIds": "a"}"#, "42"] {
            let (handler, _) = adapter(vec![]);
            let (status, json) = respond(restart(State(handler), Bytes::from(raw)).await).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{raw:?}");
            assert!(json["error"].as_str().unwrap().contains("malformed body"));
        }
    }

    #[tokio::test]
    async fn invalid_timeout_is_bad_request() {
        let (handler, _) = adapter(vec![]);
        let body = Bytes::from(r#"{"runtimeIds": ["a"], "timeout": "-5s"}"#);
        let (status, _) = respond(delete(State(handler), body).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn pods_listing_builds_owner_selector() {
        let (handler, pods) = adapter(vec![]);
        let body = Bytes::from(r#"{"users": ["alice", "bob"], "limit": 5}"#);

        let (status, json) = respond(list_pods(State(handler), body).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["continue"], "next");
        assert_eq!(json["pods"][0]["status"], "Running");
        assert_eq!(
            pods.selectors.lock().unwrap()[0],
            "userRuntimeOwner in (alice,bob),mayaResourceType=userRuntime"
        );
    }

    #[tokio::test]
    async fn pods_listing_errors() {
        let (handler, _) = adapter(vec![]);
        let body = Bytes::from(r#"{"users": ["a b"]}"#);
        let (status, _) = respond(list_pods(State(handler.clone()), body).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = Bytes::from(r#"{"namespace": "broken"}"#);
        let (status, json) = respond(list_pods(State(handler), body).await).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn pod_by_name() {
        let (handler, _) = adapter(vec![]);
        let body = Bytes::from(r#"{"name": "rt-a-0", "namespace": "runtimes"}"#);
        let (status, json) = respond(get_pod(State(handler.clone()), body).await).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["namespace"], "runtimes");

        let body = Bytes::from(r#"{"name": "rt-zzz", "namespace": "runtimes"}"#);
        let (status, _) = respond(get_pod(State(handler), body).await).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let (status, json) = read(healthz().await.into_response()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"status": "ok"}));
    }
}
