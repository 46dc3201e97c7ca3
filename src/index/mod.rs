//! Index Module - navigable view of sample data
//!
//! - `tree`: lazy, path-keyed index (`TreeIndex`, `PathNode`)
//! - `suggest`: ranked completions for a typed fragment

pub mod suggest;
pub mod tree;

pub use suggest::{SuggestionEngine, SuggestionItem};
pub use tree::{IndexedEntry, NodeKind, PathNode, TreeIndex};
