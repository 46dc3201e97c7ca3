//! Bindery - `{{path}}` binding resolution and path autocompletion
//!
//! Headless: [`binding::resolve`] and [`binding::resolve_deep`] substitute
//! `{{dot.path}}` tokens against a sample data tree.
//!
//! Interactive: [`editor::EditorSession`] drives the suggestion popup and
//! the path explorer for one text value; [`tui`] puts it in a terminal.

pub mod binding;
pub mod config;
pub mod editor;
pub mod error;
pub mod index;
pub mod sample;
pub mod tui;

pub use binding::{resolve, resolve_deep, resolve_props, BindingResolver};
pub use config::{BinderyConfig, Limits};
pub use editor::{AutocompleteController, EditorProps, EditorSession, ExplorerTreeController};
pub use error::{BinderyError, FixSuggestion, Result};
pub use index::{SuggestionEngine, SuggestionItem, TreeIndex};
pub use sample::load_sample_data;
