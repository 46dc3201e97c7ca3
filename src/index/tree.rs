//! Lazy tree index over a sample-data value
//!
//! Nodes are addressed by dot-path string, never by object identity, so
//! anything keyed on paths (expanded rows, suggestion ranking) stays
//! stable when same-shaped data is reloaded.
//!
//! Children are only enumerated on request: the explorer asks for the
//! root eagerly and for deeper levels on expand, so cost follows the
//! visible rows, not the size of the data.
//!
//! Object keys a dot-path cannot address (empty, or containing `.`) are
//! not indexed: their path would alias the root or another node.

use std::collections::VecDeque;

use serde_json::Value;

use crate::binding::path::{join, last_segment, lookup};

/// Explorer classification of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Non-empty object or array
    Branch,
    /// Scalar, null, or empty container
    Leaf,
}

impl NodeKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(map) if !map.is_empty() => Self::Branch,
            Value::Array(items) if !items.is_empty() => Self::Branch,
            _ => Self::Leaf,
        }
    }

    pub fn is_leaf(self) -> bool {
        self == Self::Leaf
    }
}

/// One row of the path explorer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathNode {
    /// Full dot-path from the root
    pub path: String,
    /// Last segment (object key or array index)
    pub label: String,
    pub kind: NodeKind,
    /// 0 for members of the root
    pub depth: usize,
}

impl PathNode {
    fn new(path: String, label: String, depth: usize, value: &Value) -> Self {
        Self {
            label,
            kind: NodeKind::of(value),
            depth,
            path,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

/// A node paired with the value it addresses
#[derive(Debug, Clone)]
pub struct IndexedEntry<'a> {
    pub node: PathNode,
    pub value: &'a Value,
}

/// Read-only index over one sample-data tree
#[derive(Debug, Clone, Copy)]
pub struct TreeIndex<'a> {
    root: &'a Value,
}

impl<'a> TreeIndex<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Value at `path` (empty path = root)
    pub fn value_at(&self, path: &str) -> Option<&'a Value> {
        lookup(self.root, path)
    }

    /// Node at a non-empty `path`
    pub fn node(&self, path: &str) -> Option<PathNode> {
        if path.is_empty() {
            return None;
        }
        let depth = path.matches('.').count();
        let label = last_segment(path).to_string();
        self.value_at(path)
            .map(|value| PathNode::new(path.to_string(), label, depth, value))
    }

    /// Classification of the value at `path`; unknown paths are leaves
    pub fn kind_of(&self, path: &str) -> NodeKind {
        self.value_at(path).map_or(NodeKind::Leaf, NodeKind::of)
    }

    /// Immediate members of the value at `path`
    ///
    /// Object keys in insertion order, array elements by index. A scalar
    /// or unknown path has no children.
    pub fn children_of(&self, path: &str) -> Vec<PathNode> {
        self.entries_of(path).into_iter().map(|e| e.node).collect()
    }

    fn entries_of(&self, path: &str) -> Vec<IndexedEntry<'a>> {
        let Some(value) = self.value_at(path) else {
            return Vec::new();
        };
        let depth = if path.is_empty() {
            0
        } else {
            path.matches('.').count() + 1
        };
        match value {
            Value::Object(map) => map
                .iter()
                .filter(|(key, _)| is_addressable_key(key))
                .map(|(key, child)| entry(path, key.clone(), depth, child))
                .collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, child)| entry(path, idx.to_string(), depth, child))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Breadth-first enumeration of every path, shallow first
    ///
    /// Stops after `max_nodes` entries so very large samples stay cheap.
    pub fn walk(&self, max_nodes: usize) -> Vec<IndexedEntry<'a>> {
        let mut out = Vec::new();
        let mut queue: VecDeque<IndexedEntry<'a>> = self.entries_of("").into();

        while let Some(current) = queue.pop_front() {
            if out.len() >= max_nodes {
                tracing::debug!(max_nodes, "path index truncated");
                break;
            }
            if current.node.kind == NodeKind::Branch {
                queue.extend(self.entries_of(&current.node.path));
            }
            out.push(current);
        }

        out
    }
}

fn entry<'v>(parent: &str, label: String, depth: usize, value: &'v Value) -> IndexedEntry<'v> {
    IndexedEntry {
        node: PathNode::new(join(parent, &label), label, depth, value),
        value,
    }
}

/// Can `lookup` reach a member stored under `key`?
fn is_addressable_key(key: &str) -> bool {
    !key.is_empty() && !key.contains('.')
}
