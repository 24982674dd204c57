//! Service configuration: optional JSON file, then environment overrides.
use std::{fs, path::PathBuf, time::Duration};

use rtm_core::{BatchConfig, DEFAULT_MAX_CONCURRENCY};
use rtm_exec::{HelmCli, RunnerConfig};
use rtm_model::CHART_NAME;
use rtm_observe::{LoggerConfig, LoggerFormat, LoggerLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names the JSON config file.
pub const ENV_CONFIG: &str = "RTM_CONFIG";
pub const ENV_LISTEN: &str = "RTM_LISTEN";
pub const ENV_LOG_LEVEL: &str = "RTM_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "RTM_LOG_FORMAT";
pub const ENV_HELM_BIN: &str = "RTM_HELM_BIN";

#[derive(Debug, Error)]
pub enum ServiceConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value in {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
}

/// Top-level configuration of the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Socket address of the HTTP API.
    pub listen: String,
    /// Explicit kubeconfig; `None` uses kube's default inference.
    pub kubeconfig: Option<PathBuf>,
    pub helm: HelmSection,
    pub batch: BatchSection,
    pub logger: LoggerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            kubeconfig: None,
            helm: HelmSection::default(),
            batch: BatchSection::default(),
            logger: LoggerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmSection {
    pub binary: String,
    pub chart: String,
    /// Extra time past helm's own `--timeout` before the process is killed.
    pub kill_grace_ms: u64,
}

impl Default for HelmSection {
    fn default() -> Self {
        Self {
            binary: "helm".to_string(),
            chart: CHART_NAME.to_string(),
            kill_grace_ms: 30_000,
        }
    }
}

impl HelmSection {
    pub fn cli(&self) -> HelmCli {
        HelmCli::new()
            .with_binary(&self.binary)
            .with_chart(&self.chart)
    }

    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            kill_grace: Duration::from_millis(self.kill_grace_ms),
            ..RunnerConfig::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    pub max_concurrency: usize,
    /// Overall bound of one batch request; unset means unbounded.
    pub deadline_secs: Option<u64>,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            deadline_secs: None,
        }
    }
}

impl BatchSection {
    pub fn to_batch_config(&self) -> BatchConfig {
        BatchConfig {
            max_concurrency: self.max_concurrency,
            deadline: self.deadline_secs.map(Duration::from_secs),
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ServiceConfigError> {
        Self::load(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` for environment variables.
    pub fn load<F>(lookup: F) -> Result<Self, ServiceConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(ENV_CONFIG).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        cfg.apply_env(lookup)?;
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> Result<Self, ServiceConfigError> {
        let raw = fs::read(path).map_err(|source| ServiceConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| ServiceConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ServiceConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(listen) = set(ENV_LISTEN) {
            self.listen = listen;
        }
        if let Some(level) = set(ENV_LOG_LEVEL) {
            self.logger.level = LoggerLevel::new(level).map_err(|e| ServiceConfigError::InvalidEnv {
                var: ENV_LOG_LEVEL,
                reason: e.to_string(),
            })?;
        }
        if let Some(format) = set(ENV_LOG_FORMAT) {
            self.logger.format =
                format
                    .parse::<LoggerFormat>()
                    .map_err(|e| ServiceConfigError::InvalidEnv {
                        var: ENV_LOG_FORMAT,
                        reason: e.to_string(),
                    })?;
        }
        if let Some(bin) = set(ENV_HELM_BIN) {
            self.helm.binary = bin;
        }
        Ok(())
    }
}
