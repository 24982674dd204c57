use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    Api, Client,
    api::{ListParams, ObjectList},
};
use rtm_core::{ClusterQueryError, PodListQuery, PodSource};
use rtm_model::{PodDetail, PodPage};
use tracing::debug;

use crate::convert::{pod_detail, pod_record};

/// [`PodSource`] reading pods through the Kubernetes API.
#[derive(Clone)]
pub struct KubePodSource {
    client: Client,
}

impl KubePodSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: Option<&str>) -> Api<Pod> {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }
}

/// Build list parameters for one page.
pub(crate) fn list_params(query: &PodListQuery) -> ListParams {
    let mut lp = ListParams::default().labels(&query.selector);
    if let Some(limit) = query.limit {
        lp = lp.limit(limit);
    }
    if let Some(token) = &query.continuation {
        lp = lp.continue_token(token);
    }
    lp
}

pub(crate) fn into_page(list: ObjectList<Pod>) -> PodPage {
    PodPage {
        records: list.items.iter().map(pod_record).collect(),
        continuation_token: list.metadata.continue_.unwrap_or_default(),
    }
}

fn api_error(e: kube::Error) -> ClusterQueryError {
    ClusterQueryError::Api(e.to_string())
}

#[async_trait]
impl PodSource for KubePodSource {
    async fn list(&self, query: &PodListQuery) -> Result<PodPage, ClusterQueryError> {
        let list = self
            .pods(query.namespace.as_deref())
            .list(&list_params(query))
            .await
            .map_err(api_error)?;
        debug!(count = list.items.len(), "listed pods");
        Ok(into_page(list))
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<PodDetail, ClusterQueryError> {
        match self.pods(Some(namespace)).get(name).await {
            Ok(pod) => Ok(pod_detail(&pod)),
            Err(kube::Error::Api(resp)) if resp.code == 404 => Err(ClusterQueryError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(api_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_params_carry_selector_and_paging() {
        let lp = list_params(&PodListQuery {
            namespace: None,
            selector: "mayaResourceType=userRuntime".into(),
            limit: Some(20),
            continuation: Some("abc".into()),
        });
        assert_eq!(lp.label_selector.as_deref(), Some("mayaResourceType=userRuntime"));
        assert_eq!(lp.limit, Some(20));
        assert_eq!(lp.continue_token.as_deref(), Some("abc"));

        let unbounded = list_params(&PodListQuery {
            selector: "x=y".into(),
            ..Default::default()
        });
        assert_eq!(unbounded.limit, None);
        assert_eq!(unbounded.continue_token, None);
    }

    #[test]
    fn page_keeps_continue_token() {
        let list: ObjectList<Pod> = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "PodList",
            "metadata": {"continue": "next-page"},
            "items": [
                {"metadata": {"name": "rt-a-0", "namespace": "ns"}},
                {"metadata": {"name": "rt-b-0", "namespace": "ns"}}
            ]
        }))
        .unwrap();

        let page = into_page(list);
        assert_eq!(page.continuation_token, "next-page");
        let names: Vec<&str> = page.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["rt-a-0", "rt-b-0"]);
    }
}
