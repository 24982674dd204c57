use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Deployed values of a release, as an immutable nested tree.
///
/// Maps keep the document order of the source JSON, which keeps every
/// traversal of the same tree deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigTree {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<ConfigTree>),
    Map(IndexMap<String, ConfigTree>),
}

impl ConfigTree {
    /// Decode a tree from `helm get values -o json` output.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::InvalidTree(e.to_string()))
    }

    /// Look up a direct child of a map node.
    pub fn get(&self, key: &str) -> Option<&ConfigTree> {
        match self {
            ConfigTree::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigTree::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigTree::Null => "null",
            ConfigTree::Bool(_) => "bool",
            ConfigTree::Number(_) => "number",
            ConfigTree::String(_) => "string",
            ConfigTree::List(_) => "list",
            ConfigTree::Map(_) => "map",
        }
    }
}
