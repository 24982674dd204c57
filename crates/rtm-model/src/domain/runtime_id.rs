use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ModelError, RELEASE_PREFIX};

/// Opaque identifier of one runtime.
///
/// Always non-empty: construction rejects empty and whitespace-only input, so a
/// `RuntimeId` can be handed to external tooling without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuntimeId(String);

impl RuntimeId {
    /// Validate and wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
        Self::try_from(raw.into())
    }

    /// Get the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Helm release backing this runtime.
    pub fn release_name(&self) -> ReleaseName {
        ReleaseName(format!("{RELEASE_PREFIX}{}", self.0))
    }
}

impl TryFrom<String> for RuntimeId {
    type Error = ModelError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if raw.trim().is_empty() {
            return Err(ModelError::EmptyRuntimeId);
        }
        Ok(Self(raw))
    }
}

impl From<RuntimeId> for String {
    fn from(id: RuntimeId) -> Self {
        id.0
    }
}

impl fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a helm release, derived from a [`RuntimeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseName(String);

impl ReleaseName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
