//! Path explorer: expandable tree of the sample data
//!
//! Expansion state is a set of dot-paths. Rows are recomputed from the
//! [`TreeIndex`] on demand, and only expanded branches are descended.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::index::{NodeKind, PathNode, TreeIndex};

/// One rendered explorer row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub node: PathNode,
    pub expanded: bool,
}

/// What activating a row did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerOutcome {
    /// A leaf was chosen; insert its path
    Selected(String),
    /// A branch was expanded or collapsed
    Toggled { path: String, expanded: bool },
    None,
}

#[derive(Debug, Clone, Default)]
pub struct ExplorerTreeController {
    expanded: BTreeSet<String>,
    active_row: usize,
}

impl ExplorerTreeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller opened on `data`
    pub fn open(data: &Value) -> Self {
        let mut explorer = Self::new();
        explorer.reset(data);
        explorer
    }

    /// Forget expansion state and pre-expand the top-level branches
    pub fn reset(&mut self, data: &Value) {
        self.expanded = TreeIndex::new(data)
            .children_of("")
            .into_iter()
            .filter(|node| node.kind == NodeKind::Branch)
            .map(|node| node.path)
            .collect();
        self.active_row = 0;
        tracing::debug!(expanded = self.expanded.len(), "explorer reset");
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expanded_paths(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    /// Flip a branch; returns the new state
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    pub fn is_leaf(&self, node: &PathNode) -> bool {
        node.is_leaf()
    }

    /// Path to insert when `node` is clicked; branches give nothing
    pub fn select_leaf(&self, node: &PathNode) -> Option<String> {
        node.is_leaf().then(|| node.path.clone())
    }

    /// Rows in display order: depth-first, expanded branches only
    pub fn visible_rows(&self, index: &TreeIndex<'_>) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        self.collect_rows(index, "", &mut rows);
        rows
    }

    fn collect_rows(&self, index: &TreeIndex<'_>, parent: &str, rows: &mut Vec<VisibleRow>) {
        for node in index.children_of(parent) {
            let expanded = node.kind == NodeKind::Branch && self.is_expanded(&node.path);
            let path = node.path.clone();
            rows.push(VisibleRow { node, expanded });
            if expanded {
                self.collect_rows(index, &path, rows);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Keyboard navigation
    // ─────────────────────────────────────────────────────────────

    pub fn active_row(&self) -> usize {
        self.active_row
    }

    pub fn move_active(&mut self, delta: isize, row_count: usize) {
        if row_count == 0 {
            self.active_row = 0;
            return;
        }
        let max = row_count - 1;
        self.active_row = self.active_row.saturating_add_signed(delta).min(max);
    }

    /// Enter on the active row: select a leaf or toggle a branch
    pub fn activate(&mut self, index: &TreeIndex<'_>) -> ExplorerOutcome {
        let rows = self.visible_rows(index);
        let Some(row) = rows.get(self.active_row) else {
            return ExplorerOutcome::None;
        };
        if let Some(path) = self.select_leaf(&row.node) {
            return ExplorerOutcome::Selected(path);
        }
        let path = row.node.path.clone();
        let expanded = self.toggle(&path);
        ExplorerOutcome::Toggled { path, expanded }
    }

    /// Right: expand the active branch
    pub fn expand_active(&mut self, index: &TreeIndex<'_>) -> bool {
        let rows = self.visible_rows(index);
        match rows.get(self.active_row) {
            Some(row) if row.node.kind == NodeKind::Branch && !row.expanded => {
                self.expanded.insert(row.node.path.clone());
                true
            }
            _ => false,
        }
    }

    /// Left: collapse the active branch, or jump to its parent
    pub fn collapse_active(&mut self, index: &TreeIndex<'_>) -> bool {
        let rows = self.visible_rows(index);
        let Some(row) = rows.get(self.active_row) else {
            return false;
        };
        if row.expanded {
            self.expanded.remove(&row.node.path);
            return true;
        }
        if row.node.depth == 0 {
            return false;
        }
        let target_depth = row.node.depth - 1;
        if let Some(parent) = rows[..self.active_row]
            .iter()
            .rposition(|r| r.node.depth == target_depth)
        {
            self.active_row = parent;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "customer": {"name": "John", "address": {"city": "Paris"}},
            "items": [{"price": 1}],
            "total": 3,
            "meta": {}
        })
    }

    fn paths(rows: &[VisibleRow]) -> Vec<&str> {
        rows.iter().map(|r| r.node.path.as_str()).collect()
    }

    #[test]
    fn open_expands_top_level_branches_only() {
        let data = sample();
        let explorer = ExplorerTreeController::open(&data);
        assert!(explorer.is_expanded("customer"));
        assert!(explorer.is_expanded("items"));
        assert!(!explorer.is_expanded("customer.address"));
        // Empty object is a leaf
        assert!(!explorer.is_expanded("meta"));
        assert!(!explorer.is_expanded("total"));
    }

    #[test]
    fn rows_descend_expanded_only() {
        let data = sample();
        let index = TreeIndex::new(&data);
        let mut explorer = ExplorerTreeController::open(&data);
        assert_eq!(
            paths(&explorer.visible_rows(&index)),
            vec![
                "customer",
                "customer.name",
                "customer.address",
                "items",
                "items.0",
                "total",
                "meta"
            ]
        );

        explorer.toggle("customer.address");
        explorer.toggle("items");
        assert_eq!(
            paths(&explorer.visible_rows(&index)),
            vec![
                "customer",
                "customer.name",
                "customer.address",
                "customer.address.city",
                "items",
                "total",
                "meta"
            ]
        );
    }

    #[test]
    fn toggle_flips_state() {
        let mut explorer = ExplorerTreeController::new();
        assert!(explorer.toggle("customer"));
        assert!(explorer.is_expanded("customer"));
        assert!(!explorer.toggle("customer"));
        assert!(!explorer.is_expanded("customer"));
    }

    #[test]
    fn select_leaf_ignores_branches() {
        let data = sample();
        let index = TreeIndex::new(&data);
        let explorer = ExplorerTreeController::open(&data);
        let leaf = index.node("customer.name").unwrap();
        let branch = index.node("customer.address").unwrap();
        assert_eq!(explorer.select_leaf(&leaf), Some("customer.name".into()));
        assert_eq!(explorer.select_leaf(&branch), None);
        assert!(!explorer.is_leaf(&branch));
    }

    #[test]
    fn selecting_does_not_touch_expansion() {
        let data = sample();
        let index = TreeIndex::new(&data);
        let mut explorer = ExplorerTreeController::open(&data);
        let before: Vec<String> = explorer.expanded_paths().map(String::from).collect();

        explorer.move_active(1, explorer.visible_rows(&index).len());
        assert_eq!(
            explorer.activate(&index),
            ExplorerOutcome::Selected("customer.name".into())
        );
        let after: Vec<String> = explorer.expanded_paths().map(String::from).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn activate_branch_toggles() {
        let data = sample();
        let index = TreeIndex::new(&data);
        let mut explorer = ExplorerTreeController::open(&data);
        assert_eq!(
            explorer.activate(&index),
            ExplorerOutcome::Toggled {
                path: "customer".into(),
                expanded: false
            }
        );
        assert_eq!(explorer.visible_rows(&index)[1].node.path, "items");
    }

    #[test]
    fn move_is_clamped() {
        let mut explorer = ExplorerTreeController::new();
        explorer.move_active(-3, 4);
        assert_eq!(explorer.active_row(), 0);
        explorer.move_active(10, 4);
        assert_eq!(explorer.active_row(), 3);
        explorer.move_active(1, 0);
        assert_eq!(explorer.active_row(), 0);
    }

    #[test]
    fn left_collapses_then_jumps_to_parent() {
        let data = sample();
        let index = TreeIndex::new(&data);
        let mut explorer = ExplorerTreeController::open(&data);
        // customer.address
        explorer.move_active(2, 7);
        assert!(explorer.expand_active(&index));
        assert!(explorer.collapse_active(&index));
        assert!(!explorer.is_expanded("customer.address"));
        assert!(explorer.collapse_active(&index));
        assert_eq!(explorer.active_row(), 0);
    }

    #[test]
    fn reset_on_new_data() {
        let mut explorer = ExplorerTreeController::open(&sample());
        explorer.reset(&json!({"order": {"id": 1}}));
        assert!(explorer.is_expanded("order"));
        assert!(!explorer.is_expanded("customer"));
    }

    #[test]
    fn scalar_root_has_no_rows() {
        let data = json!("just a string");
        let explorer = ExplorerTreeController::open(&data);
        assert!(explorer.visible_rows(&TreeIndex::new(&data)).is_empty());
    }

    #[test]
    fn empty_root_key_is_skipped() {
        let data = json!({"": {"x": 1}});
        let explorer = ExplorerTreeController::open(&data);
        assert!(!explorer.is_expanded(""));
        assert!(explorer.visible_rows(&TreeIndex::new(&data)).is_empty());
    }

    #[test]
    fn dotted_key_rows_keep_depth() {
        let data = json!({"a.b": {"c": 1}, "x": {"y": 2}});
        let index = TreeIndex::new(&data);
        let mut explorer = ExplorerTreeController::open(&data);
        let rows = explorer.visible_rows(&index);
        assert_eq!(paths(&rows), vec!["x", "x.y"]);
        assert_eq!(rows[0].node.depth, 0);

        explorer.move_active(1, rows.len());
        assert!(explorer.collapse_active(&index));
        assert_eq!(explorer.active_row(), 0);
    }
}
