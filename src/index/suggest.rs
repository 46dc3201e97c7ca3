//! Path suggestions for a partially typed binding
//!
//! Matching is a case-insensitive prefix test of the fragment against
//! the full dot-path, or against the last segment when the fragment has
//! no dot (`na` finds `customer.name`). Ranking puts shallow paths
//! first, then shorter ones, then lexical order.

use std::cmp::Ordering;

use serde_json::Value;

use super::tree::{IndexedEntry, TreeIndex};
use crate::binding::path::last_segment;
use crate::binding::resolve::stringify;
use crate::config::{BinderyConfig, Limits};

/// One entry in the suggestion popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionItem {
    /// Full dot-path inserted on selection
    pub path: String,
    /// Last segment, for display
    pub label: String,
    /// Short rendering of the sample value
    pub preview_value: String,
}

/// Computes ranked completions from a sample-data tree
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    max_suggestions: usize,
    max_index_nodes: usize,
    preview_width: usize,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::from_config(&BinderyConfig::default())
    }
}

impl SuggestionEngine {
    pub fn new(limits: &Limits, preview_width: usize) -> Self {
        Self {
            max_suggestions: limits.max_suggestions,
            max_index_nodes: limits.max_index_nodes,
            preview_width,
        }
    }

    pub fn from_config(config: &BinderyConfig) -> Self {
        Self::new(&config.limits, config.preview_width)
    }

    /// Ranked suggestions for `fragment` (text typed after `{{`)
    pub fn suggest(&self, data: &Value, fragment: &str) -> Vec<SuggestionItem> {
        let needle = fragment.trim().to_lowercase();
        let index = TreeIndex::new(data);

        let mut matches: Vec<IndexedEntry<'_>> = index
            .walk(self.max_index_nodes)
            .into_iter()
            .filter(|entry| matches(&entry.node.path, &needle))
            .collect();

        matches.sort_by(|a, b| rank(&a.node.path, &b.node.path));
        matches.truncate(self.max_suggestions);

        tracing::trace!(fragment, count = matches.len(), "suggestions computed");

        matches
            .into_iter()
            .map(|entry| SuggestionItem {
                preview_value: preview(entry.value, self.preview_width),
                label: entry.node.label,
                path: entry.node.path,
            })
            .collect()
    }
}

/// Does `path` match an already-lowercased fragment?
pub fn matches(path: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let path = path.to_lowercase();
    if path.starts_with(needle) {
        return true;
    }
    !needle.contains('.') && last_segment(&path).starts_with(needle)
}

/// Fewer segments, then shorter, then lexical
fn rank(a: &str, b: &str) -> Ordering {
    let depth = |p: &str| p.matches('.').count();
    depth(a)
        .cmp(&depth(b))
        .then_with(|| a.len().cmp(&b.len()))
        .then_with(|| a.cmp(b))
}

/// Short, single-line rendering of a value
pub fn preview(value: &Value, width: usize) -> String {
    let text = match value {
        Value::Null => "null".to_string(),
        Value::Object(map) => format!("{{{} keys}}", map.len()),
        Value::Array(items) => format!("[{} items]", items.len()),
        other => stringify(other).unwrap_or_default(),
    };
    let text = text.replace(['\n', '\r'], " ");
    truncate(&text, width)
}

/// Truncate on a char boundary with an ellipsis
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}
