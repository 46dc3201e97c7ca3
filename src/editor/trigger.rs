//! Binding-context detection at the cursor
//!
//! The active fragment is the text between the nearest `{{` before the
//! cursor and the cursor itself, provided no `}}` closes it in between.

/// An open `{{` the cursor is typing into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFragment {
    /// Byte offset of the opening `{{`
    pub open: usize,
    /// Byte offset of the cursor
    pub cursor: usize,
}

impl ActiveFragment {
    /// Text typed after `{{`
    pub fn text<'a>(&self, value: &'a str) -> &'a str {
        value.get(self.open + 2..self.cursor).unwrap_or("")
    }
}

/// Find the binding the cursor is in, if any
pub fn find_active_fragment(value: &str, cursor: usize) -> Option<ActiveFragment> {
    let cursor = clamp_cursor(value, cursor);
    let before = &value[..cursor];
    let open = before.rfind("{{")?;
    if before[open + 2..].contains("}}") {
        return None;
    }
    Some(ActiveFragment { open, cursor })
}

/// Clamp a byte offset into `value`, backing off to a char boundary
pub fn clamp_cursor(value: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(value.len());
    while !value.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}
