//! Path addressing inside a JSON document tree.
//!
//! Both store backends keep (part of) the database as a single JSON value
//! and address into it with `/`-separated paths. A `null` or empty object
//! counts as absent, matching how the realtime database never stores empty
//! nodes.

use serde_json::{Map, Value};

use super::error::StoreError;

/// Split a path into its keys. The root path (`""` or `"/"`) has none.
///
/// # Errors
///
/// Returns `StoreError::InvalidPath` if the path contains an empty key.
pub fn segments(path: &str) -> Result<Vec<String>, StoreError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let keys: Vec<String> = trimmed.split('/').map(str::to_owned).collect();
    if keys.iter().any(String::is_empty) {
        return Err(StoreError::InvalidPath(path.to_owned()));
    }
    Ok(keys)
}

/// Whether a value is present (not `null`, not an empty object).
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Read the value at a path, `None` if absent.
pub fn get<'v>(root: &'v Value, keys: &[String]) -> Option<&'v Value> {
    keys.iter()
        .try_fold(root, |node, key| node.get(key.as_str()))
        .filter(|value| is_present(value))
}

/// Write a value at a path, creating intermediate objects.
///
/// Writing `null` removes the key.
pub fn set(root: &mut Value, keys: &[String], value: Value) {
    let Some((last, parents)) = keys.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for key in parents {
        node = ensure_object(node)
            .entry(key.clone())
            .or_insert(Value::Null);
    }

    let map = ensure_object(node);
    if value.is_null() {
        map.remove(last);
    } else {
        map.insert(last.clone(), value);
    }
}

/// Apply a patch: every child in `children` is written under the path.
pub fn merge(root: &mut Value, keys: &[String], children: Map<String, Value>) {
    for (child, value) in children {
        let mut child_keys = keys.to_vec();
        child_keys.push(child);
        set(root, &child_keys, value);
    }
}

/// Whether a change at one path can affect the value at the other.
pub fn overlaps(a: &[String], b: &[String]) -> bool {
    a.iter().zip(b).all(|(x, y)| x == y)
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}
