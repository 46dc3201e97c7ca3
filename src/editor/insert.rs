//! Writing a chosen path back into the text value

use super::trigger::{clamp_cursor, ActiveFragment};

/// Result of a selection-driven edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub value: String,
    /// Byte offset just after the inserted token
    pub cursor: usize,
}

/// `{{path}}`
pub fn format_token(path: &str) -> String {
    format!("{{{{{}}}}}", path)
}

/// Autocomplete: replace `[open, cursor)` with `{{path}}`
///
/// Only the fragment is replaced; text after the cursor is kept as is.
pub fn replace_fragment(value: &str, active: ActiveFragment, path: &str) -> Insertion {
    let open = clamp_cursor(value, active.open);
    let cursor = clamp_cursor(value, active.cursor).max(open);
    let token = format_token(path);

    let mut out = String::with_capacity(value.len() + token.len());
    out.push_str(&value[..open]);
    out.push_str(&token);
    let new_cursor = out.len();
    out.push_str(&value[cursor..]);

    Insertion {
        value: out,
        cursor: new_cursor,
    }
}

/// Explorer: append `{{path}}` with no separator
pub fn append_token(value: &str, path: &str) -> Insertion {
    let mut out = String::with_capacity(value.len() + path.len() + 4);
    out.push_str(value);
    out.push_str(&format_token(path));
    Insertion {
        cursor: out.len(),
        value: out,
    }
}
