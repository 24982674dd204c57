use std::fmt;

use serde::{Deserialize, Serialize};

/// How a batch drives its per-runtime operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchMode {
    /// One runtime after another, in input order.
    #[default]
    Sequential,
    /// All runtimes in parallel, bounded by the orchestrator's concurrency cap.
    Concurrent,
}

impl BatchMode {
    pub fn as_label(&self) -> &'static str {
        match self {
            BatchMode::Sequential => "sequential",
            BatchMode::Concurrent => "concurrent",
        }
    }
}

impl From<bool> for BatchMode {
    fn from(concurrent: bool) -> Self {
        if concurrent {
            BatchMode::Concurrent
        } else {
            BatchMode::Sequential
        }
    }
}

/// Lifecycle operation applied to a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Restart,
    Delete,
}

impl Operation {
    pub fn as_label(&self) -> &'static str {
        match self {
            Operation::Restart => "restart",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
