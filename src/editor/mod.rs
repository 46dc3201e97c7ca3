//! Editor Module - interactive authoring of `{{path}}` bindings
//!
//! - `trigger`: is the cursor inside an open `{{`?
//! - `debounce`: the single re-armable timer slot
//! - `autocomplete`: Closed / Pending / Open popup state machine
//! - `explorer`: expandable path tree
//! - `insert`: how a chosen path is written back
//! - `session`: ties the above to one value and its `on_change`

pub mod autocomplete;
pub mod debounce;
pub mod explorer;
pub mod insert;
pub mod session;
pub mod trigger;

pub use autocomplete::{AutocompleteController, PopupState};
pub use debounce::{DebounceSlot, TimerTicket};
pub use explorer::{ExplorerOutcome, ExplorerTreeController, VisibleRow};
pub use insert::{append_token, format_token, replace_fragment, Insertion};
pub use session::{EditorEvent, EditorProps, EditorSession, Focus};
pub use trigger::{find_active_fragment, ActiveFragment};
