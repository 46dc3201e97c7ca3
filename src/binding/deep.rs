//! Deep resolution over prop trees
//!
//! Walks a JSON-shaped prop tree and resolves every string leaf,
//! rebuilding arrays and objects in the same order. Numbers, booleans
//! and nulls pass through.
//!
//! Depth guard: a subtree nested deeper than `max_depth` is returned
//! unresolved instead of recursing further.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::resolve::TextResolver;
use crate::config::DEFAULT_MAX_DEPTH;

/// Resolve every string leaf of `node` against `data`
///
/// With no sample data the tree is returned unchanged.
pub fn resolve_deep(node: &Value, data: Option<&Value>) -> Value {
    resolve_deep_with(node, &data, DEFAULT_MAX_DEPTH)
}

/// Resolve every string leaf of `node` with an explicit resolver and depth limit
pub fn resolve_deep_with<R>(node: &Value, resolver: &R, max_depth: usize) -> Value
where
    R: TextResolver + ?Sized,
{
    if !resolver.has_data() {
        return node.clone();
    }
    walk(node, resolver, 0, max_depth)
}

fn walk<R>(node: &Value, resolver: &R, depth: usize, max_depth: usize) -> Value
where
    R: TextResolver + ?Sized,
{
    match node {
        Value::String(s) => Value::String(resolver.resolve_text(s).into_owned()),
        Value::Array(_) | Value::Object(_) if depth >= max_depth => {
            tracing::warn!(
                depth,
                max_depth,
                "prop tree nested too deep, leaving subtree unresolved"
            );
            node.clone()
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| walk(item, resolver, depth + 1, max_depth))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), walk(value, resolver, depth + 1, max_depth));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Resolve a typed prop structure
///
/// The props go through `serde_json::Value` and back. If either
/// conversion fails the props are returned unchanged.
pub fn resolve_props<T>(props: &T, data: Option<&Value>) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    resolve_props_with(props, &data, DEFAULT_MAX_DEPTH)
}

pub fn resolve_props_with<T, R>(props: &T, resolver: &R, max_depth: usize) -> T
where
    T: Serialize + DeserializeOwned + Clone,
    R: TextResolver + ?Sized,
{
    if !resolver.has_data() {
        return props.clone();
    }

    let tree = match serde_json::to_value(props) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::warn!(error = %e, "props are not JSON-representable, skipping resolution");
            return props.clone();
        }
    };

    let resolved = resolve_deep_with(&tree, resolver, max_depth);
    serde_json::from_value(resolved).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "resolved props no longer match their type, keeping originals");
        props.clone()
    })
}
