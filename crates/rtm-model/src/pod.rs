use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Read-only projection of a runtime pod.
///
/// Field names on the wire follow the service's established JSON contract
/// (`status` carries the pod phase, IP fields keep their upper-case suffix).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodRecord {
    pub name: String,
    pub namespace: String,
    pub uid: String,
    /// RFC3339 creation timestamp.
    pub created_at: Option<String>,
    /// Value of the runtime-owner label.
    pub owner_id: String,
    pub node: String,
    #[serde(rename = "status")]
    pub phase: String,
    #[serde(rename = "hostIP")]
    pub host_ip: String,
    #[serde(rename = "podIP")]
    pub pod_ip: String,
    /// RFC3339 start time of the first running container.
    pub start_time: Option<String>,
}

/// One page of a pod listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodPage {
    #[serde(rename = "pods")]
    pub records: Vec<PodRecord>,
    /// Opaque cursor for the next page; empty on the last page.
    #[serde(rename = "continue")]
    pub continuation_token: String,
}

/// Full detail of a single pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodDetail {
    #[serde(flatten)]
    pub record: PodRecord,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account: Option<String>,
    #[serde(default)]
    pub containers: Vec<ContainerDetail>,
}

/// Per-container status inside [`PodDetail`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDetail {
    pub name: String,
    pub image: String,
    pub ready: bool,
    pub restart_count: i32,
    /// `running`, `waiting`, `terminated` or `unknown`.
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Which users' runtimes a pod listing covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerFilter(Vec<String>);

impl OwnerFilter {
    /// Match runtimes of every user.
    pub fn all() -> Self {
        Self(Vec::new())
    }

    /// Match runtimes owned by any of the given users.
    pub fn users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(users.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn owners(&self) -> &[String] {
        &self.0
    }
}
