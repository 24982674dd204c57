//! Flattening of release values into helm `--set` assignments.
//!
//! `{"image": {"tag": "1.2"}, "args": ["a", "b"]}` becomes
//! `["image.tag=1.2", "args[0]=a", "args[1]=b"]`.
//!
//! Values are escaped for helm's `--set` parser (backslash, comma and a
//! leading `{`), so assignments can be joined with `,` without one value
//! bleeding into the next.
use rtm_model::ConfigTree;

use crate::error::ConfigError;

/// Characters that would change the meaning of a `--set` path.
const RESERVED_KEY_CHARS: [char; 6] = ['.', '[', ']', '=', ',', '\\'];

/// Flatten `tree` into ordered `path=value` assignments rooted at `prefix`.
///
/// Map children are visited in insertion order, so the output is
/// deterministic for a given tree. List elements use index paths
/// (`prefix[0]`, `prefix[1]`, ...); an empty list becomes `prefix={}` and an
/// empty map emits nothing.
pub fn flatten(prefix: &str, tree: &ConfigTree) -> Result<Vec<String>, ConfigError> {
    let mut out = Vec::new();
    walk(prefix, tree, &mut out)?;
    Ok(out)
}

fn walk(path: &str, node: &ConfigTree, out: &mut Vec<String>) -> Result<(), ConfigError> {
    match node {
        ConfigTree::Map(children) => {
            for (key, child) in children {
                validate_key(path, key)?;
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                walk(&child_path, child, out)?;
            }
        }
        ConfigTree::List(items) => {
            require_path(path, node)?;
            if items.is_empty() {
                out.push(format!("{path}={{}}"));
            }
            for (idx, item) in items.iter().enumerate() {
                walk(&format!("{path}[{idx}]"), item, out)?;
            }
        }
        ConfigTree::Null => leaf(path, node, "null", out)?,
        ConfigTree::Bool(b) => leaf(path, node, &b.to_string(), out)?,
        ConfigTree::Number(n) => leaf(path, node, &n.to_string(), out)?,
        ConfigTree::String(s) => leaf(path, node, s, out)?,
    }
    Ok(())
}

fn leaf(
    path: &str,
    node: &ConfigTree,
    raw: &str,
    out: &mut Vec<String>,
) -> Result<(), ConfigError> {
    require_path(path, node)?;
    out.push(format!("{path}={}", escape_value(raw)));
    Ok(())
}

fn require_path(path: &str, node: &ConfigTree) -> Result<(), ConfigError> {
    if path.is_empty() {
        return Err(ConfigError::UnnamedValue { kind: node.kind() });
    }
    Ok(())
}

fn validate_key(path: &str, key: &str) -> Result<(), ConfigError> {
    if key.is_empty() || key.contains(RESERVED_KEY_CHARS) {
        return Err(ConfigError::InvalidKey {
            path: path.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Escape a raw value for helm's `--set` parser.
///
/// `\` and `,` are backslash-escaped everywhere; `{` only in first position,
/// where helm would otherwise start a list literal.
pub fn escape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (idx, c) in raw.chars().enumerate() {
        match c {
            '\\' | ',' => out.push('\\'),
            '{' if idx == 0 => out.push('\\'),
            _ => {}
        }
        out.push(c);
    }
    out
}
