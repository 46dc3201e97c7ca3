//! One editing session: the input, its autocomplete popup and the explorer
//!
//! The session owns the text (through the [`AutocompleteController`]) and
//! reports every change to the host through `on_change`, synchronously,
//! with the full new value.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::autocomplete::{AutocompleteController, PopupState};
use super::explorer::{ExplorerOutcome, ExplorerTreeController, VisibleRow};
use super::insert::{append_token, Insertion};
use crate::binding::resolve;
use crate::config::BinderyConfig;
use crate::index::{PathNode, TreeIndex};

/// Host-supplied inputs of a session
#[derive(Debug, Clone, Default)]
pub struct EditorProps {
    pub value: String,
    pub sample_data: Option<Arc<Value>>,
    pub multiline: bool,
    pub placeholder: Option<String>,
}

impl EditorProps {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_sample_data(mut self, data: Arc<Value>) -> Self {
        self.sample_data = Some(data);
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Called with the full value after every edit
pub type ChangeHandler = Box<dyn FnMut(&str)>;

/// Which panel receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Explorer,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Input => Self::Explorer,
            Self::Explorer => Self::Input,
        }
    }
}

/// Terminal-independent editing events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    Char(char),
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

pub struct EditorSession {
    autocomplete: AutocompleteController,
    explorer: ExplorerTreeController,
    focus: Focus,
    multiline: bool,
    placeholder: Option<String>,
    on_change: Option<ChangeHandler>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("autocomplete", &self.autocomplete)
            .field("explorer", &self.explorer)
            .field("focus", &self.focus)
            .field("multiline", &self.multiline)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    pub fn new(props: EditorProps, config: &BinderyConfig) -> Self {
        let explorer = match &props.sample_data {
            Some(data) => ExplorerTreeController::open(data),
            None => ExplorerTreeController::new(),
        };
        Self {
            autocomplete: AutocompleteController::new(props.value, props.sample_data, config),
            explorer,
            focus: Focus::Input,
            multiline: props.multiline,
            placeholder: props.placeholder,
            on_change: None,
        }
    }

    pub fn on_change(mut self, handler: impl FnMut(&str) + 'static) -> Self {
        self.on_change = Some(Box::new(handler));
        self
    }

    // ─────────────────────────────────────────────────────────────
    // Selectors
    // ─────────────────────────────────────────────────────────────

    pub fn value(&self) -> &str {
        self.autocomplete.value()
    }

    pub fn cursor(&self) -> usize {
        self.autocomplete.cursor()
    }

    pub fn popup(&self) -> &PopupState {
        self.autocomplete.popup()
    }

    pub fn autocomplete(&self) -> &AutocompleteController {
        &self.autocomplete
    }

    pub fn explorer(&self) -> &ExplorerTreeController {
        &self.explorer
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Placeholder to show, only while the value is empty
    pub fn placeholder(&self) -> Option<&str> {
        if self.value().is_empty() {
            self.placeholder.as_deref()
        } else {
            None
        }
    }

    pub fn sample_data(&self) -> Option<&Arc<Value>> {
        self.autocomplete.sample_data()
    }

    pub fn is_mounted(&self) -> bool {
        self.autocomplete.is_mounted()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.autocomplete.next_deadline()
    }

    /// Explorer rows for the current data (empty without data)
    pub fn explorer_rows(&self) -> Vec<VisibleRow> {
        match self.sample_data() {
            Some(data) => self.explorer.visible_rows(&TreeIndex::new(data)),
            None => Vec::new(),
        }
    }

    /// The value with bindings resolved against the sample data
    pub fn preview(&self) -> Cow<'_, str> {
        resolve::resolve(self.value(), self.sample_data().map(|d| d.as_ref()))
    }

    // ─────────────────────────────────────────────────────────────
    // Host updates
    // ─────────────────────────────────────────────────────────────

    /// Controlled value replaced by the host; no `on_change`
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.autocomplete.set_value(value);
    }

    /// New sample data; a different tree resets the explorer
    pub fn set_sample_data(&mut self, data: Option<Arc<Value>>) {
        if !self.autocomplete.set_sample_data(data) {
            return;
        }
        match self.autocomplete.sample_data() {
            Some(data) => self.explorer.reset(data),
            None => self.explorer = ExplorerTreeController::new(),
        }
    }

    pub fn poll_timer(&mut self, now: Instant) -> bool {
        self.autocomplete.poll_timer(now)
    }

    pub fn unmount(&mut self) {
        self.autocomplete.unmount();
        tracing::debug!("editor session unmounted");
    }

    // ─────────────────────────────────────────────────────────────
    // Text editing
    // ─────────────────────────────────────────────────────────────

    pub fn insert_char(&mut self, ch: char, now: Instant) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf), now);
    }

    pub fn insert_str(&mut self, text: &str, now: Instant) {
        let cursor = self.cursor();
        let mut value = self.value().to_string();
        value.insert_str(cursor, text);
        self.edit(value, cursor + text.len(), now);
    }

    pub fn backspace(&mut self, now: Instant) {
        let cursor = self.cursor();
        let Some(ch) = self.value()[..cursor].chars().next_back() else {
            return;
        };
        let start = cursor - ch.len_utf8();
        let mut value = self.value().to_string();
        value.replace_range(start..cursor, "");
        self.edit(value, start, now);
    }

    pub fn delete(&mut self, now: Instant) {
        let cursor = self.cursor();
        let Some(ch) = self.value()[cursor..].chars().next() else {
            return;
        };
        let mut value = self.value().to_string();
        value.replace_range(cursor..cursor + ch.len_utf8(), "");
        self.edit(value, cursor, now);
    }

    pub fn move_left(&mut self, now: Instant) {
        let cursor = self.cursor();
        if let Some(ch) = self.value()[..cursor].chars().next_back() {
            self.autocomplete.on_cursor_moved(cursor - ch.len_utf8(), now);
        }
    }

    pub fn move_right(&mut self, now: Instant) {
        let cursor = self.cursor();
        if let Some(ch) = self.value()[cursor..].chars().next() {
            self.autocomplete.on_cursor_moved(cursor + ch.len_utf8(), now);
        }
    }

    pub fn move_home(&mut self, now: Instant) {
        self.autocomplete.on_cursor_moved(0, now);
    }

    pub fn move_end(&mut self, now: Instant) {
        let end = self.value().len();
        self.autocomplete.on_cursor_moved(end, now);
    }

    fn edit(&mut self, value: String, cursor: usize, now: Instant) {
        if !self.is_mounted() {
            return;
        }
        self.autocomplete.on_input(value, cursor, now);
        self.emit();
    }

    // ─────────────────────────────────────────────────────────────
    // Insertion
    // ─────────────────────────────────────────────────────────────

    /// Accept the highlighted suggestion
    pub fn accept_suggestion(&mut self) -> bool {
        let inserted = self.autocomplete.accept();
        self.commit(inserted)
    }

    pub fn select_suggestion(&mut self, index: usize) -> bool {
        let inserted = self.autocomplete.select(index);
        self.commit(inserted)
    }

    /// Explorer click: append `{{path}}` for a leaf
    pub fn select_explorer_node(&mut self, node: &PathNode) -> bool {
        match self.explorer.select_leaf(node) {
            Some(path) => self.append_binding(&path),
            None => false,
        }
    }

    fn append_binding(&mut self, path: &str) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let insertion = append_token(self.value(), path);
        self.autocomplete.set_value(insertion.value);
        tracing::debug!(path, "explorer binding appended");
        self.emit();
        true
    }

    fn commit(&mut self, inserted: Option<Insertion>) -> bool {
        if inserted.is_none() {
            return false;
        }
        self.emit();
        true
    }

    fn emit(&mut self) {
        if let Some(handler) = self.on_change.as_mut() {
            handler(self.autocomplete.value());
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Key dispatch
    // ─────────────────────────────────────────────────────────────

    /// Route one event; returns false when the session ignored it
    pub fn handle(&mut self, event: EditorEvent, now: Instant) -> bool {
        if !self.is_mounted() {
            return false;
        }
        match self.focus {
            Focus::Input => self.handle_input(event, now),
            Focus::Explorer => self.handle_explorer(event),
        }
    }

    fn handle_input(&mut self, event: EditorEvent, now: Instant) -> bool {
        let open = self.popup().is_open();
        match event {
            EditorEvent::Char(ch) => self.insert_char(ch, now),
            EditorEvent::Enter if open => return self.accept_suggestion(),
            EditorEvent::Enter if self.multiline => self.insert_char('\n', now),
            EditorEvent::Enter => return false,
            EditorEvent::Tab if open => return self.accept_suggestion(),
            EditorEvent::Tab => self.toggle_focus(),
            EditorEvent::Escape => return self.autocomplete.on_escape(),
            EditorEvent::Up if open => self.autocomplete.highlight_prev(),
            EditorEvent::Down if open => self.autocomplete.highlight_next(),
            EditorEvent::Up | EditorEvent::Down => return false,
            EditorEvent::Backspace => self.backspace(now),
            EditorEvent::Delete => self.delete(now),
            EditorEvent::Left => self.move_left(now),
            EditorEvent::Right => self.move_right(now),
            EditorEvent::Home => self.move_home(now),
            EditorEvent::End => self.move_end(now),
        }
        true
    }

    fn handle_explorer(&mut self, event: EditorEvent) -> bool {
        let Some(data) = self.sample_data().cloned() else {
            if matches!(event, EditorEvent::Tab | EditorEvent::Escape) {
                self.toggle_focus();
                return true;
            }
            return false;
        };
        let index = TreeIndex::new(&data);

        match event {
            EditorEvent::Up => {
                let rows = self.explorer.visible_rows(&index).len();
                self.explorer.move_active(-1, rows);
            }
            EditorEvent::Down => {
                let rows = self.explorer.visible_rows(&index).len();
                self.explorer.move_active(1, rows);
            }
            EditorEvent::Right => return self.explorer.expand_active(&index),
            EditorEvent::Left => return self.explorer.collapse_active(&index),
            EditorEvent::Enter => match self.explorer.activate(&index) {
                ExplorerOutcome::Selected(path) => return self.append_binding(&path),
                ExplorerOutcome::Toggled { .. } => {}
                ExplorerOutcome::None => return false,
            },
            EditorEvent::Tab | EditorEvent::Escape => self.toggle_focus(),
            _ => return false,
        }
        true
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
        if self.focus == Focus::Explorer {
            self.autocomplete.on_escape();
        }
    }
}
