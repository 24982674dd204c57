//! Read-only queries over runtime pods.
//!
//! Selector assembly and input validation live here; the cluster access
//! itself is behind [`PodSource`] (see the `rtm-kube` crate).
use std::sync::Arc;

use async_trait::async_trait;
use rtm_model::{
    LABEL_RESOURCE_TYPE, LABEL_RUNTIME_OWNER, OwnerFilter, PodDetail, PodPage,
    RESOURCE_TYPE_USER_RUNTIME,
};
use tracing::debug;

use crate::error::ClusterQueryError;

/// Validated parameters of one pod listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodListQuery {
    /// Namespace to list; `None` lists across all namespaces.
    pub namespace: Option<String>,
    /// Kubernetes label selector expression.
    pub selector: String,
    /// Page size; `None` returns everything.
    pub limit: Option<u32>,
    /// Cursor returned by the previous page.
    pub continuation: Option<String>,
}

/// Cluster access used by [`PodQueryService`].
#[async_trait]
pub trait PodSource: Send + Sync + 'static {
    async fn list(&self, query: &PodListQuery) -> Result<PodPage, ClusterQueryError>;

    async fn get(&self, namespace: &str, name: &str) -> Result<PodDetail, ClusterQueryError>;
}

/// Label selector matching the runtime pods of `filter`.
///
/// Rules:
/// - no owners: `mayaResourceType=userRuntime`;
/// - owners: `userRuntimeOwner in (a,b),mayaResourceType=userRuntime`;
/// - owners must be non-empty and free of selector syntax (`,` `(` `)` `=` `!` whitespace).
pub fn label_selector(filter: &OwnerFilter) -> Result<String, ClusterQueryError> {
    let runtime_only = format!("{LABEL_RESOURCE_TYPE}={RESOURCE_TYPE_USER_RUNTIME}");
    if filter.is_all() {
        return Ok(runtime_only);
    }

    for owner in filter.owners() {
        let breaks_grammar = owner.is_empty()
            || owner
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '=' | '!'));
        if breaks_grammar {
            return Err(ClusterQueryError::InvalidSelector(format!(
                "owner id {owner:?} is not a valid label value"
            )));
        }
    }
    Ok(format!(
        "{LABEL_RUNTIME_OWNER} in ({}),{runtime_only}",
        filter.owners().join(",")
    ))
}

/// Pod listing and lookup for the HTTP layer.
pub struct PodQueryService {
    source: Arc<dyn PodSource>,
}

impl PodQueryService {
    pub fn new(source: Arc<dyn PodSource>) -> Self {
        Self { source }
    }

    /// List runtime pods owned by `filter`.
    ///
    /// An empty `namespace` lists all namespaces, `limit == 0` means no limit
    /// and an empty `continuation` starts from the first page.
    pub async fn list_pods(
        &self,
        filter: &OwnerFilter,
        namespace: &str,
        limit: i64,
        continuation: &str,
    ) -> Result<PodPage, ClusterQueryError> {
        let limit = match limit {
            0 => None,
            n if n < 0 => {
                return Err(ClusterQueryError::InvalidQuery(format!(
                    "limit must not be negative, got {n}"
                )));
            }
            n => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        };
        let query = PodListQuery {
            namespace: non_empty(namespace),
            selector: label_selector(filter)?,
            limit,
            continuation: non_empty(continuation),
        };

        debug!(
            selector = %query.selector,
            namespace = ?query.namespace,
            limit = ?query.limit,
            "listing pods"
        );
        self.source.list(&query).await
    }

    /// Fetch a single pod with full detail.
    pub async fn get_pod(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<PodDetail, ClusterQueryError> {
        if namespace.trim().is_empty() || name.trim().is_empty() {
            return Err(ClusterQueryError::InvalidQuery(
                "pod lookup needs both namespace and name".into(),
            ));
        }
        debug!(namespace, name, "fetching pod");
        self.source.get(namespace, name).await
    }
}

fn non_empty(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtm_model::PodRecord;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSource {
        queries: Mutex<Vec<PodListQuery>>,
    }

    #[async_trait]
    impl PodSource for RecordingSource {
        async fn list(&self, query: &PodListQuery) -> Result<PodPage, ClusterQueryError> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(PodPage {
                records: vec![PodRecord {
                    name: "rt-a-0".into(),
                    ..Default::default()
                }],
                continuation_token: String::new(),
            })
        }

        async fn get(&self, namespace: &str, name: &str) -> Result<PodDetail, ClusterQueryError> {
            Err(ClusterQueryError::NotFound {
                namespace: namespace.into(),
                name: name.into(),
            })
        }
    }

    #[test]
    fn selector_for_named_owners() {
        let sel = label_selector(&OwnerFilter::users(["alice", "bob"])).unwrap();
        assert_eq!(
            sel,
            "userRuntimeOwner in (alice,bob),mayaResourceType=userRuntime"
        );
    }

    #[test]
    fn selector_for_everyone() {
        assert_eq!(
            label_selector(&OwnerFilter::all()).unwrap(),
            "mayaResourceType=userRuntime"
        );
    }

    #[test]
    fn selector_rejects_grammar_breaking_owners() {
        for bad in ["", "a,b", "x)", "a b", "k=v", "!x"] {
            assert!(
                matches!(
                    label_selector(&OwnerFilter::users([bad])),
                    Err(ClusterQueryError::InvalidSelector(_))
                ),
                "{bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn list_translates_request_into_query() {
        let source = Arc::new(RecordingSource::default());
        let svc = PodQueryService::new(source.clone());

        let page = svc
            .list_pods(&OwnerFilter::users(["alice"]), "", 0, "")
            .await
            .unwrap();
        assert_eq!(page.records.len(), 1);

        svc.list_pods(&OwnerFilter::all(), "runtimes", 50, "tok")
            .await
            .unwrap();

        let queries = source.queries.lock().unwrap().clone();
        assert_eq!(
            queries[0],
            PodListQuery {
                namespace: None,
                selector: "userRuntimeOwner in (alice),mayaResourceType=userRuntime".into(),
                limit: None,
                continuation: None,
            }
        );
        assert_eq!(queries[1].namespace.as_deref(), Some("runtimes"));
        assert_eq!(queries[1].limit, Some(50));
        assert_eq!(queries[1].continuation.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn negative_limit_is_rejected_before_the_cluster() {
        let source = Arc::new(RecordingSource::default());
        let svc = PodQueryService::new(source.clone());
        let err = svc.list_pods(&OwnerFilter::all(), "", -1, "").await.unwrap_err();
        assert!(matches!(err, ClusterQueryError::InvalidQuery(_)));
        assert!(source.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_pod_validates_and_propagates() {
        let svc = PodQueryService::new(Arc::new(RecordingSource::default()));
        assert!(matches!(
            svc.get_pod("", "rt-a-0").await,
            Err(ClusterQueryError::InvalidQuery(_))
        ));
        assert!(matches!(
            svc.get_pod("runtimes", "rt-a-0").await,
            Err(ClusterQueryError::NotFound { .. })
        ));
    }
}
