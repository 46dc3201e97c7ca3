//! Binding Module - `{{path}}` resolution against sample data
//!
//! - `path`: dot-path parsing and lenient lookup
//! - `resolve`: single-string substitution, token cache, `BindingResolver`
//! - `deep`: recursive resolution of prop trees
//!
//! Data flow:
//! ```text
//! "Hi {{customer.name}}" ──tokenize──► [Literal, Binding]
//!                                          │
//!                           lookup(sample, "customer.name")
//!                                          │
//!                                   stringify ──► "Hi John"
//! ```
//!
//! With no sample data everything passes through untouched.

pub mod deep;
pub mod path;
pub mod resolve;

// Re-export public types
pub use deep::{resolve_deep, resolve_deep_with, resolve_props};
pub use path::{lookup, parse_dot_path, DotPath, Segment};
pub use resolve::{
    extract_refs, resolve, resolve_path, stringify, tokenize, BindingRef, BindingResolver,
    TextResolver, Token,
};
