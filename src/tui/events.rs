//! Event Handling - Keyboard input processing

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::editor::EditorEvent;

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Edit(EditorEvent),
    None,
}

/// Map a key press to an action
pub fn handle_key_event(key: KeyEvent) -> Action {
    // Quit: Ctrl+C or Ctrl+Q (plain `q` is text)
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Action::Quit,
        _ => {}
    }

    let event = match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            EditorEvent::Char(ch)
        }
        KeyCode::Enter => EditorEvent::Enter,
        KeyCode::Tab | KeyCode::BackTab => EditorEvent::Tab,
        KeyCode::Esc => EditorEvent::Escape,
        KeyCode::Backspace => EditorEvent::Backspace,
        KeyCode::Delete => EditorEvent::Delete,
        KeyCode::Left => EditorEvent::Left,
        KeyCode::Right => EditorEvent::Right,
        KeyCode::Up => EditorEvent::Up,
        KeyCode::Down => EditorEvent::Down,
        KeyCode::Home => EditorEvent::Home,
        KeyCode::End => EditorEvent::End,
        _ => return Action::None,
    };
    Action::Edit(event)
}

/// Poll for a key press with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind != KeyEventKind::Release {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}
