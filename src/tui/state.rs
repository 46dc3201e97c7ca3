//! AppState - Domain Layer
//!
//! Wraps one [`EditorSession`] and records what the host would receive
//! through `on_change`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use crate::config::BinderyConfig;
use crate::editor::{EditorProps, EditorSession};

// ─────────────────────────────────────────────────────────────────────────────
// Core State
// ─────────────────────────────────────────────────────────────────────────────

/// Last value emitted by the session and how many changes were emitted
#[derive(Debug, Default)]
pub struct ChangeLog {
    pub value: String,
    pub count: usize,
}

#[derive(Debug)]
pub struct AppState {
    pub session: EditorSession,
    pub changes: Rc<RefCell<ChangeLog>>,
    /// Shown in the header: file name or "no sample data"
    pub data_label: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(props: EditorProps, config: &BinderyConfig, data_label: impl Into<String>) -> Self {
        let changes = Rc::new(RefCell::new(ChangeLog {
            value: props.value.clone(),
            count: 0,
        }));
        let sink = Rc::clone(&changes);
        let session = EditorSession::new(props, config).on_change(move |value| {
            let mut log = sink.borrow_mut();
            log.value = value.to_string();
            log.count += 1;
        });

        Self {
            session,
            changes,
            data_label: data_label.into(),
            should_quit: false,
        }
    }

    pub fn sample_data(&self) -> Option<&Arc<Value>> {
        self.session.sample_data()
    }

    pub fn change_count(&self) -> usize {
        self.changes.borrow().count
    }

    /// Final value handed back when the editor exits
    pub fn committed_value(&self) -> String {
        self.changes.borrow().value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Instant;

    #[test]
    fn test_changes_are_recorded() {
        let mut state = AppState::new(EditorProps::new("a"), &BinderyConfig::default(), "-");
        assert_eq!(state.committed_value(), "a");
        state.session.insert_char('b', Instant::now());
        assert_eq!(state.committed_value(), "ab");
        assert_eq!(state.change_count(), 1);
    }

    #[test]
    fn test_sample_data_is_shared() {
        let data = Arc::new(json!({"a": 1}));
        let props = EditorProps::new("").with_sample_data(Arc::clone(&data));
        let state = AppState::new(props, &BinderyConfig::default(), "data.json");
        assert!(Arc::ptr_eq(state.sample_data().unwrap(), &data));
    }
}
