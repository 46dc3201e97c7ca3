//! Autocomplete state machine
//!
//! ```text
//!            keystroke in {{…            timer fires, matches
//!  Closed ─────────────────────► Pending ─────────────────────► Open
//!    ▲                            │  ▲ keystroke re-arms          │
//!    │   escape / context lost /  │  └─────────────────────────── ┤
//!    └──── no data / selection ───┴───────────────────────────────┘
//! ```
//!
//! Every transition happens synchronously inside one of the `on_*`
//! methods. The only deferred step is the debounce timer, held in a
//! single [`DebounceSlot`] owned by the controller.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::debounce::{DebounceSlot, TimerTicket};
use super::insert::{replace_fragment, Insertion};
use super::trigger::{clamp_cursor, find_active_fragment, ActiveFragment};
use crate::config::BinderyConfig;
use crate::index::{SuggestionEngine, SuggestionItem};

/// Suggestion popup state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    /// Debounce timer armed, nothing shown yet
    Pending,
    Open {
        suggestions: Vec<SuggestionItem>,
        highlighted: usize,
    },
}

impl PopupState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

impl fmt::Display for PopupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Pending => write!(f, "PENDING"),
            Self::Open { suggestions, .. } => write!(f, "OPEN({})", suggestions.len()),
        }
    }
}

/// Live-typing controller for one editing session
#[derive(Debug)]
pub struct AutocompleteController {
    raw_value: String,
    cursor: usize,
    popup: PopupState,
    timer: DebounceSlot,
    sample_data: Option<Arc<Value>>,
    engine: SuggestionEngine,
    mounted: bool,
}

impl AutocompleteController {
    /// New controller with the cursor at the end of `value`
    pub fn new(
        value: impl Into<String>,
        sample_data: Option<Arc<Value>>,
        config: &BinderyConfig,
    ) -> Self {
        let raw_value = value.into();
        Self {
            cursor: raw_value.len(),
            raw_value,
            popup: PopupState::Closed,
            timer: DebounceSlot::new(config.debounce()),
            sample_data,
            engine: SuggestionEngine::from_config(config),
            mounted: true,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Selectors
    // ─────────────────────────────────────────────────────────────

    pub fn value(&self) -> &str {
        &self.raw_value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    pub fn sample_data(&self) -> Option<&Arc<Value>> {
        self.sample_data.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        match &self.popup {
            PopupState::Open { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    pub fn highlighted(&self) -> Option<usize> {
        match &self.popup {
            PopupState::Open { highlighted, .. } => Some(*highlighted),
            _ => None,
        }
    }

    pub fn active_fragment(&self) -> Option<ActiveFragment> {
        find_active_fragment(&self.raw_value, self.cursor)
    }

    /// When the host should next call [`Self::poll_timer`]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn timer_pending(&self) -> bool {
        self.timer.is_pending()
    }

    // ─────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────

    /// A keystroke changed the value
    ///
    /// Returns the ticket of the armed timer when the edit left the
    /// cursor inside a binding.
    pub fn on_input(
        &mut self,
        value: impl Into<String>,
        cursor: usize,
        now: Instant,
    ) -> Option<TimerTicket> {
        if !self.mounted {
            return None;
        }
        self.raw_value = value.into();
        self.cursor = clamp_cursor(&self.raw_value, cursor);
        self.refresh(now)
    }

    /// The cursor moved without editing
    pub fn on_cursor_moved(&mut self, cursor: usize, now: Instant) -> Option<TimerTicket> {
        if !self.mounted {
            return None;
        }
        let cursor = clamp_cursor(&self.raw_value, cursor);
        if cursor == self.cursor {
            return None;
        }
        self.cursor = cursor;
        self.refresh(now)
    }

    /// Re-evaluate the binding context and (re)arm or close
    fn refresh(&mut self, now: Instant) -> Option<TimerTicket> {
        if self.sample_data.is_none() || self.active_fragment().is_none() {
            self.close();
            return None;
        }
        let ticket = self.timer.arm(now);
        self.transition(PopupState::Pending);
        Some(ticket)
    }

    /// A timer fired; stale or cancelled tickets are ignored
    pub fn on_timer(&mut self, ticket: TimerTicket) -> bool {
        if !self.mounted || !self.timer.fire(ticket) {
            return false;
        }

        let (Some(data), Some(active)) = (self.sample_data.clone(), self.active_fragment()) else {
            self.close();
            return true;
        };

        let suggestions = self.engine.suggest(&data, active.text(&self.raw_value));
        if suggestions.is_empty() {
            self.transition(PopupState::Closed);
        } else {
            self.transition(PopupState::Open {
                suggestions,
                highlighted: 0,
            });
        }
        true
    }

    /// Fire the pending timer if its deadline has passed
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        match self.timer.due(now) {
            Some(ticket) => self.on_timer(ticket),
            None => false,
        }
    }

    /// Escape: close from any state, value untouched
    ///
    /// Returns true when something was closed.
    pub fn on_escape(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        let was_active = !self.popup.is_closed() || self.timer.is_pending();
        self.close();
        was_active
    }

    pub fn highlight_next(&mut self) {
        if let PopupState::Open {
            suggestions,
            highlighted,
        } = &mut self.popup
        {
            *highlighted = (*highlighted + 1) % suggestions.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if let PopupState::Open {
            suggestions,
            highlighted,
        } = &mut self.popup
        {
            *highlighted = if *highlighted == 0 {
                suggestions.len() - 1
            } else {
                *highlighted - 1
            };
        }
    }

    /// Accept the highlighted suggestion
    pub fn accept(&mut self) -> Option<Insertion> {
        let index = self.highlighted()?;
        self.select(index)
    }

    /// Select suggestion `index`: replace the fragment with `{{path}}`
    pub fn select(&mut self, index: usize) -> Option<Insertion> {
        if !self.mounted {
            return None;
        }
        let path = self.suggestions().get(index)?.path.clone();
        let active = self.active_fragment()?;

        let insertion = replace_fragment(&self.raw_value, active, &path);
        tracing::debug!(path = %path, "suggestion inserted");
        self.raw_value = insertion.value.clone();
        self.cursor = insertion.cursor;
        self.close();
        Some(insertion)
    }

    /// Value replaced by the host (not a keystroke); cursor goes to the end
    pub fn set_value(&mut self, value: impl Into<String>) {
        if !self.mounted {
            return;
        }
        self.raw_value = value.into();
        self.cursor = self.raw_value.len();
        self.close();
    }

    /// Swap the sample data; a different tree cancels pending work
    ///
    /// Returns true when the identity changed.
    pub fn set_sample_data(&mut self, data: Option<Arc<Value>>) -> bool {
        if !self.mounted {
            return false;
        }
        let same = match (&self.sample_data, &data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }
        self.sample_data = data;
        self.close();
        true
    }

    /// The owning session is gone: cancel and stop reacting
    pub fn unmount(&mut self) {
        self.close();
        self.mounted = false;
    }

    fn close(&mut self) {
        if self.timer.cancel() {
            tracing::trace!("debounce timer cancelled");
        }
        self.transition(PopupState::Closed);
    }

    fn transition(&mut self, next: PopupState) {
        if self.popup != next {
            tracing::debug!(from = %self.popup, to = %next, "popup transition");
        }
        self.popup = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    const WINDOW: Duration = Duration::from_millis(150);

    fn data() -> Option<Arc<Value>> {
        Some(Arc::new(json!({
            "customer": {"name": "John", "email": "j@x.com"},
            "total": 3
        })))
    }

    fn controller(sample: Option<Arc<Value>>) -> AutocompleteController {
        AutocompleteController::new("", sample, &BinderyConfig::default())
    }

    /// Type `text` at the end of the value, one char per keystroke, 10ms apart
    fn type_text(ctrl: &mut AutocompleteController, text: &str, mut now: Instant) -> Instant {
        for ch in text.chars() {
            let mut value = ctrl.value().to_string();
            value.push(ch);
            let cursor = value.len();
            ctrl.on_input(value, cursor, now);
            now += Duration::from_millis(10);
        }
        now
    }

    #[test]
    fn opens_after_debounce() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        let now = type_text(&mut ctrl, "Hi {{cu", t0);
        assert_eq!(ctrl.popup(), &PopupState::Pending);

        assert!(!ctrl.poll_timer(now));
        assert!(ctrl.poll_timer(now + WINDOW));
        assert!(ctrl.popup().is_open());
        assert_eq!(ctrl.suggestions()[0].path, "customer");
        assert_eq!(ctrl.highlighted(), Some(0));
    }

    #[test]
    fn keystrokes_rearm_trailing_edge() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("{{", 2, t0);
        ctrl.on_input("{{c", 3, t0 + Duration::from_millis(100));
        // First deadline passes but the timer was re-armed
        assert!(!ctrl.poll_timer(t0 + Duration::from_millis(160)));
        assert_eq!(ctrl.popup(), &PopupState::Pending);
        assert!(ctrl.poll_timer(t0 + Duration::from_millis(250)));
        assert!(ctrl.popup().is_open());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        let first = ctrl.on_input("{{", 2, t0).unwrap();
        let second = ctrl.on_input("{{t", 3, t0).unwrap();
        assert!(!ctrl.on_timer(first));
        assert!(ctrl.on_timer(second));
        assert_eq!(ctrl.suggestions()[0].path, "total");
    }

    #[test]
    fn no_data_never_leaves_closed() {
        let t0 = Instant::now();
        let mut ctrl = controller(None);
        let now = type_text(&mut ctrl, "{{", t0);
        assert_eq!(ctrl.popup(), &PopupState::Closed);
        assert!(!ctrl.timer_pending());
        assert!(!ctrl.poll_timer(now + WINDOW * 10));
        assert_eq!(ctrl.popup(), &PopupState::Closed);
    }

    #[test]
    fn escape_from_pending_cancels_timer() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("x {{cu", 6, t0);
        assert!(ctrl.on_escape());
        assert_eq!(ctrl.popup(), &PopupState::Closed);
        assert_eq!(ctrl.value(), "x {{cu");
        assert!(!ctrl.timer_pending());
        assert!(!ctrl.poll_timer(t0 + WINDOW * 2));
        assert_eq!(ctrl.popup(), &PopupState::Closed);
    }

    #[test]
    fn escape_from_open() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("{{", 2, t0);
        ctrl.poll_timer(t0 + WINDOW);
        assert!(ctrl.popup().is_open());
        assert!(ctrl.on_escape());
        assert_eq!(ctrl.popup(), &PopupState::Closed);
        assert_eq!(ctrl.value(), "{{");
        assert!(!ctrl.on_escape());
    }

    #[test]
    fn selection_replaces_fragment() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("Dear {{na, welcome", 9, t0);
        ctrl.poll_timer(t0 + WINDOW);
        assert_eq!(ctrl.suggestions()[0].path, "customer.name");

        let ins = ctrl.accept().unwrap();
        assert_eq!(ins.value, "Dear {{customer.name}}, welcome");
        assert_eq!(ctrl.value(), ins.value);
        assert_eq!(ctrl.cursor(), "Dear {{customer.name}}".len());
        assert_eq!(ctrl.popup(), &PopupState::Closed);
    }

    #[test]
    fn highlight_wraps() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("{{customer.", 11, t0);
        ctrl.poll_timer(t0 + WINDOW);
        assert_eq!(ctrl.suggestions().len(), 2);
        ctrl.highlight_prev();
        assert_eq!(ctrl.highlighted(), Some(1));
        ctrl.highlight_next();
        assert_eq!(ctrl.highlighted(), Some(0));
        ctrl.highlight_next();
        let ins = ctrl.accept().unwrap();
        assert_eq!(ins.value, "{{customer.email}}");
    }

    #[test]
    fn typing_close_braces_loses_context() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        let now = type_text(&mut ctrl, "{{total}}", t0);
        assert_eq!(ctrl.popup(), &PopupState::Closed);
        assert!(!ctrl.poll_timer(now + WINDOW));
    }

    #[test]
    fn cursor_leaving_binding_closes() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("ab {{cu", 7, t0);
        ctrl.poll_timer(t0 + WINDOW);
        assert!(ctrl.popup().is_open());
        ctrl.on_cursor_moved(1, t0 + WINDOW);
        assert_eq!(ctrl.popup(), &PopupState::Closed);
        assert!(!ctrl.timer_pending());
    }

    #[test]
    fn no_matches_closes() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("{{zzz", 5, t0);
        assert!(ctrl.poll_timer(t0 + WINDOW));
        assert_eq!(ctrl.popup(), &PopupState::Closed);
    }

    #[test]
    fn data_identity_change_cancels() {
        let t0 = Instant::now();
        let sample = data();
        let mut ctrl = controller(sample.clone());
        ctrl.on_input("{{", 2, t0);

        // Same Arc: nothing happens
        assert!(!ctrl.set_sample_data(sample));
        assert!(ctrl.timer_pending());

        assert!(ctrl.set_sample_data(data()));
        assert!(!ctrl.timer_pending());
        assert_eq!(ctrl.popup(), &PopupState::Closed);
    }

    #[test]
    fn removing_data_closes_open_popup() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        ctrl.on_input("{{", 2, t0);
        ctrl.poll_timer(t0 + WINDOW);
        assert!(ctrl.set_sample_data(None));
        assert_eq!(ctrl.popup(), &PopupState::Closed);
        ctrl.on_input("{{c", 3, t0 + WINDOW);
        assert_eq!(ctrl.popup(), &PopupState::Closed);
    }

    #[test]
    fn unmount_stops_all_updates() {
        let t0 = Instant::now();
        let mut ctrl = controller(data());
        let ticket = ctrl.on_input("{{", 2, t0).unwrap();
        ctrl.unmount();
        assert!(!ctrl.is_mounted());
        assert!(!ctrl.on_timer(ticket));
        assert!(!ctrl.poll_timer(t0 + WINDOW));
        assert_eq!(ctrl.on_input("{{c", 3, t0), None);
        assert_eq!(ctrl.value(), "{{");
        assert_eq!(ctrl.popup(), &PopupState::Closed);
    }

    #[test]
    fn popup_display() {
        assert_eq!(PopupState::Closed.to_string(), "CLOSED");
        assert_eq!(PopupState::Pending.to_string(), "PENDING");
    }
}
