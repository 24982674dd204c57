mod constants;
pub use constants::{
    CHART_NAME, CHECKSUM_KEY, DEFAULT_HELM_TIMEOUT, LABEL_RESOURCE_TYPE, LABEL_RUNTIME_OWNER,
    PRIVATE_CHARTS_REPO_KEY, RELEASE_PREFIX, RESOURCE_TYPE_USER_RUNTIME,
};

mod runtime_id;
pub use runtime_id::{ReleaseName, RuntimeId};

mod timeout;
pub use timeout::HelmTimeout;

mod mode;
pub use mode::{BatchMode, Operation};
