//! Well-known names shared by the release, executor and pod layers.
//!
//! Keeping them here avoids scattering magic strings throughout the workspace.

/// Prefix that turns a runtime id into its helm release name (`rt-<id>`).
pub const RELEASE_PREFIX: &str = "rt-";

/// Chart every runtime release is installed from.
pub const CHART_NAME: &str = "mayanr";

/// Root key of the deployed values that holds the chart repository URL.
pub const PRIVATE_CHARTS_REPO_KEY: &str = "privateChartsRepo";

/// Values path rewritten on every restart so the workload's pods roll.
pub const CHECKSUM_KEY: &str = "podAnnotations.checksum";

/// Timeout used when a request does not carry one (helm's own default).
pub const DEFAULT_HELM_TIMEOUT: &str = "5m0s";

/// Pod label naming the user that owns a runtime.
pub const LABEL_RUNTIME_OWNER: &str = "userRuntimeOwner";

/// Pod label classifying the resource.
pub const LABEL_RESOURCE_TYPE: &str = "mayaResourceType";

/// Value of [`LABEL_RESOURCE_TYPE`] carried by runtime pods.
pub const RESOURCE_TYPE_USER_RUNTIME: &str = "userRuntime";
