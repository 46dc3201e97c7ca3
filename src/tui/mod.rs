//! TUI Module - single-session binding editor
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        UI LAYER (app.rs)                            │
//! │  Pure rendering: input, popup, explorer, preview.                   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ EditorSession (state.rs)
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      INPUT LAYER (events.rs)                        │
//! │  crossterm KeyEvent → Action. Poll timeout bounded by the debounce  │
//! │  deadline, so the popup opens without a busy loop.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod state;
mod theme;

pub use app::TuiApp;
pub use events::{handle_key_event, Action};
pub use state::AppState;
pub use theme::EditorTheme;

use crate::config::BinderyConfig;
use crate::editor::EditorProps;

/// Run the editor; returns the final value
pub async fn run(
    props: EditorProps,
    config: &BinderyConfig,
    data_label: &str,
) -> anyhow::Result<String> {
    let app = TuiApp::new(props, config, data_label);
    app.run().await
}
