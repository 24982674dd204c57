mod domain;
pub use domain::{BatchMode, HelmTimeout, Operation, ReleaseName, RuntimeId};
pub use domain::{
    CHART_NAME, CHECKSUM_KEY, DEFAULT_HELM_TIMEOUT, LABEL_RESOURCE_TYPE, LABEL_RUNTIME_OWNER,
    PRIVATE_CHARTS_REPO_KEY, RELEASE_PREFIX, RESOURCE_TYPE_USER_RUNTIME,
};

mod error;
pub use error::{ModelError, ModelResult};

mod tree;
pub use tree::ConfigTree;

mod batch;
pub use batch::{BatchResult, OperationOutcome};

mod pod;
pub use pod::{ContainerDetail, OwnerFilter, PodDetail, PodPage, PodRecord};
