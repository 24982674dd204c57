use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of one runtime operation within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub id: String,
    pub succeeded: bool,
}

impl OperationOutcome {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            succeeded: true,
        }
    }

    pub fn failure(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            succeeded: false,
        }
    }
}

/// Per-runtime success flags of one batch, keyed by the requested id.
///
/// Serialized as a plain JSON object with sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResult(BTreeMap<String, bool>);

impl BatchResult {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Start a result where every id is recorded as failed.
    pub fn seeded<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(|id| (id.into(), false)).collect())
    }

    /// Record an outcome, overwriting any previous value for the id.
    pub fn record(&mut self, outcome: OperationOutcome) {
        self.0.insert(outcome.id, outcome.succeeded);
    }

    pub fn get(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of ids whose operation succeeded.
    pub fn succeeded(&self) -> usize {
        self.0.values().filter(|ok| **ok).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_ids_start_as_failed() {
        let mut res = BatchResult::seeded(["a", "b"]);
        assert_eq!(res.get("a"), Some(false));
        assert_eq!(res.succeeded(), 0);

        res.record(OperationOutcome::success("a"));
        assert_eq!(res.get("a"), Some(true));
        assert_eq!(res.get("b"), Some(false));
        assert_eq!(res.len(), 2);
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut res = BatchResult::new();
        res.record(OperationOutcome::failure("b"));
        res.record(OperationOutcome::success("a"));

        let json = serde_json::to_string(&res).unwrap();
        assert_eq!(json, r#"{"a":true,"b":false}"#);
    }
}
