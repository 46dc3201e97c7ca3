//! Dot-path parsing and lookup
//!
//! Supports:
//! - `a.b.c` (dot notation)
//! - `items.0.price` (numeric segment = array index)
//! - `items[0].price` (bracket index, strict parser only)
//!
//! Two entry points:
//! - [`lookup`] is lenient and total: any failure is just `None`. The
//!   resolver and the tree index use it.
//! - [`parse_dot_path`] is strict and reports malformed paths. The CLI
//!   uses it for user-supplied paths.

use std::fmt;

use serde_json::Value;

use crate::error::{BinderyError, Result};

/// A parsed dot-path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object field access: `.field`
    Field(String),
    /// Array index access: `.0` or `[0]`
    Index(usize),
}

/// A validated dot-path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DotPath {
    segments: Vec<Segment>,
}

impl DotPath {
    /// The root path (no segments)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Apply this path to a value
    pub fn apply<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        let mut current = value;
        for segment in &self.segments {
            current = match segment {
                Segment::Field(name) => match current {
                    Value::Object(map) => map.get(name)?,
                    _ => return None,
                },
                Segment::Index(idx) => match current {
                    Value::Array(items) => items.get(*idx)?,
                    Value::Object(map) => map.get(&idx.to_string())?,
                    _ => return None,
                },
            };
        }
        Some(current)
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                Segment::Field(name) => f.write_str(name)?,
                Segment::Index(idx) => write!(f, "{}", idx)?,
            }
        }
        Ok(())
    }
}

/// Parse a dot-path strictly
///
/// Examples:
/// - `"customer.name"` → [Field("customer"), Field("name")]
/// - `"items[0].name"` → [Field("items"), Index(0), Field("name")]
/// - `""` → root
pub fn parse_dot_path(path: &str) -> Result<DotPath> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Ok(DotPath::root());
    }

    let invalid = || BinderyError::InvalidPath {
        path: path.to_string(),
    };

    let mut segments = Vec::new();

    for part in trimmed.split('.') {
        if part.is_empty() {
            return Err(invalid());
        }

        // field[0] or [0]
        if let Some(bracket_pos) = part.find('[') {
            let field = &part[..bracket_pos];
            if !field.is_empty() {
                segments.push(Segment::Field(field.to_string()));
            }
            if !part.ends_with(']') {
                return Err(invalid());
            }
            let index_str = &part[bracket_pos + 1..part.len() - 1];
            if !is_index(index_str) {
                return Err(invalid());
            }
            let index: usize = index_str.parse().map_err(|_| invalid())?;
            segments.push(Segment::Index(index));
        } else if is_index(part) {
            let index: usize = part.parse().map_err(|_| invalid())?;
            segments.push(Segment::Index(index));
        } else {
            segments.push(Segment::Field(part.to_string()));
        }
    }

    Ok(DotPath { segments })
}

/// True when `segment` is a canonical array index (`0`, `7`, `12`, not `07` or `+1`)
pub fn is_index(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment.len() == 1 || !segment.starts_with('0'))
}

/// Lenient lookup of a dot-path; empty path is the root
///
/// A key segment indexes objects; a numeric segment indexes arrays by
/// position (and objects by the literal key). Null, scalars, missing
/// keys and out-of-bounds indexes all yield `None`.
pub fn lookup<'v>(data: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return Some(data);
    }
    path.split('.').try_fold(data, step)
}

/// One traversal step; no allocation
pub(crate) fn step<'v>(current: &'v Value, segment: &str) -> Option<&'v Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) if is_index(segment) => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Join a parent path and a child segment
pub fn join(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        let mut path = String::with_capacity(parent.len() + 1 + segment.len());
        path.push_str(parent);
        path.push('.');
        path.push_str(segment);
        path
    }
}

/// Last segment of a path (the label shown in the explorer)
pub fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
