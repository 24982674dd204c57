use rtm_core::ClusterQueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ClusterQueryError> for ApiError {
    fn from(err: ClusterQueryError) -> Self {
        match err {
            ClusterQueryError::InvalidSelector(_) | ClusterQueryError::InvalidQuery(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ClusterQueryError::NotFound { .. } | ClusterQueryError::Api(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

#[cfg(feature = "http")]
mod response {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde_json::json;
    use tracing::warn;

    use super::ApiError;

    impl ApiError {
        pub fn status(&self) -> StatusCode {
            match self {
                ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
                ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            let status = self.status();
            if status.is_server_error() {
                warn!(error = %self, "request failed");
            }
            (status, Json(json!({ "error": self.to_string() }))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_problems_are_client_errors() {
        let err: ApiError = ClusterQueryError::InvalidSelector("a,b".into()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn missing_pod_is_internal() {
        let err: ApiError = ClusterQueryError::NotFound {
            namespace: "ns".into(),
            name: "p".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Internal(ref m) if m.contains("ns/p")));
    }
}
