//! Projection of `core/v1` pods onto the service's pod records.
use k8s_openapi::{
    api::core::v1::{ContainerState, ContainerStatus, Pod},
    apimachinery::pkg::apis::meta::v1::Time,
    chrono::SecondsFormat,
};
use rtm_model::{ContainerDetail, LABEL_RUNTIME_OWNER, PodDetail, PodRecord};

/// Summary fields of a pod.
///
/// `start_time` is when the first container entered `running`, not the pod's
/// own scheduling time.
pub fn pod_record(pod: &Pod) -> PodRecord {
    let meta = &pod.metadata;
    let spec = pod.spec.as_ref();
    let status = pod.status.as_ref();

    let first_started = status
        .and_then(|s| s.container_statuses.as_ref())
        .and_then(|cs| cs.first())
        .and_then(|c| c.state.as_ref())
        .and_then(|st| st.running.as_ref())
        .and_then(|r| r.started_at.as_ref());

    PodRecord {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        uid: meta.uid.clone().unwrap_or_default(),
        created_at: meta.creation_timestamp.as_ref().map(rfc3339),
        owner_id: meta
            .labels
            .as_ref()
            .and_then(|l| l.get(LABEL_RUNTIME_OWNER))
            .cloned()
            .unwrap_or_default(),
        node: spec.and_then(|s| s.node_name.clone()).unwrap_or_default(),
        phase: status.and_then(|s| s.phase.clone()).unwrap_or_default(),
        host_ip: status.and_then(|s| s.host_ip.clone()).unwrap_or_default(),
        pod_ip: status.and_then(|s| s.pod_ip.clone()).unwrap_or_default(),
        start_time: first_started.map(rfc3339),
    }
}

/// Summary plus labels, annotations and per-container state.
pub fn pod_detail(pod: &Pod) -> PodDetail {
    let meta = &pod.metadata;
    let spec = pod.spec.as_ref();
    let statuses = pod
        .status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();

    let containers = spec
        .map(|s| s.containers.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|c| {
            let status = statuses.iter().find(|st| st.name == c.name);
            container_detail(&c.name, c.image.as_deref(), status)
        })
        .collect();

    PodDetail {
        record: pod_record(pod),
        labels: meta.labels.clone().unwrap_or_default(),
        annotations: meta.annotations.clone().unwrap_or_default(),
        restart_policy: spec.and_then(|s| s.restart_policy.clone()),
        service_account: spec.and_then(|s| s.service_account_name.clone()),
        containers,
    }
}

fn container_detail(
    name: &str,
    image: Option<&str>,
    status: Option<&ContainerStatus>,
) -> ContainerDetail {
    let (state, reason) = status
        .and_then(|s| s.state.as_ref())
        .map(state_label)
        .unwrap_or(("unknown", None));

    ContainerDetail {
        name: name.to_string(),
        image: image.unwrap_or_default().to_string(),
        ready: status.map(|s| s.ready).unwrap_or(false),
        restart_count: status.map(|s| s.restart_count).unwrap_or(0),
        state: state.to_string(),
        reason,
    }
}

fn state_label(state: &ContainerState) -> (&'static str, Option<String>) {
    if state.running.is_some() {
        ("running", None)
    } else if let Some(w) = &state.waiting {
        ("waiting", w.reason.clone())
    } else if let Some(t) = &state.terminated {
        ("terminated", t.reason.clone())
    } else {
        ("unknown", None)
    }
}

fn rfc3339(t: &Time) -> String {
    t.0.to_rfc3339_opts(SecondsFormat::Secs, true)
}
