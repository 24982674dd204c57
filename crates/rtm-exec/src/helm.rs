//! Pure builders for the helm invocations used by the service.
//!
//! Argument order and flag names are part of the external contract with the
//! helm CLI; tests pin them exactly.
use std::time::Duration;

use rtm_model::{CHART_NAME, HelmTimeout, ReleaseName};

use crate::CommandSpec;

/// Helm command-line settings shared by all invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmCli {
    binary: String,
    chart: String,
}

impl HelmCli {
    /// Helm found on `PATH`, installing from the default chart.
    pub fn new() -> Self {
        Self {
            binary: "helm".to_string(),
            chart: CHART_NAME.to_string(),
        }
    }

    /// Use a specific helm executable.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Upgrade against a different chart name.
    pub fn with_chart(mut self, chart: impl Into<String>) -> Self {
        self.chart = chart.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn chart(&self) -> &str {
        &self.chart
    }

    /// `helm get values <release> -o json`
    pub fn get_values(&self, release: &ReleaseName, timeout: Duration) -> CommandSpec {
        CommandSpec::new(&self.binary)
            .args(["get", "values", release.as_str(), "-o", "json"])
            .timeout(timeout)
    }

    /// `helm upgrade <release> <chart> --repo <repo> --set <assignments> --timeout <t> --wait -o json`
    ///
    /// `assignments` must already be escaped; they are joined with `,`.
    pub fn upgrade(
        &self,
        release: &ReleaseName,
        repo: &str,
        assignments: &[String],
        timeout: &HelmTimeout,
    ) -> CommandSpec {
        CommandSpec::new(&self.binary)
            .args(["upgrade", release.as_str(), self.chart.as_str()])
            .args(["--repo", repo])
            .args(["--set".to_string(), assignments.join(",")])
            .args(["--timeout", timeout.as_str()])
            .args(["--wait", "-o", "json"])
            .timeout(timeout.duration())
    }

    /// `helm uninstall <release> --timeout <t>`
    pub fn uninstall(&self, release: &ReleaseName, timeout: &HelmTimeout) -> CommandSpec {
        CommandSpec::new(&self.binary)
            .args(["uninstall", release.as_str()])
            .args(["--timeout", timeout.as_str()])
            .timeout(timeout.duration())
    }
}

impl Default for HelmCli {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` if helm's stderr reports that the release does not exist.
///
/// Covers `get values` ("release: not found") and `uninstall`
/// ("Release not loaded: <name>: release: not found").
pub fn is_release_missing(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("release: not found") || lower.contains("release not loaded")
}
