//! Binding resolution - `{{path}}` substitution
//!
//! Single syntax: `{{customer.name}}`, `{{items.0.price}}`.
//!
//! Contract:
//! - No sample data at all: the text is returned untouched, literal
//!   tokens included (headless pass-through).
//! - Sample data present: every complete token is replaced, unresolved
//!   paths become the empty string.
//! - A `{{` without a later `}}` is not a token and is copied through.
//!
//! Returns `Cow::Borrowed` whenever nothing was substituted.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Number, Value};

use super::deep;
use super::path::lookup;
use crate::config::Limits;

/// Leftmost `{{`, then the nearest `}}` after it
static BINDING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("binding pattern is valid"));

/// Token representing a parsed template fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text (range in the original string)
    Literal(Range<usize>),
    /// `{{path}}`: `span` covers the delimiters, `path` the trimmed interior
    Binding {
        span: Range<usize>,
        path: Range<usize>,
    },
}

/// A binding found in a text, for highlighting and inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRef {
    /// Trimmed dot-path inside the delimiters
    pub path: String,
    /// Byte span of the whole token, delimiters included
    pub span: Range<usize>,
}

/// Anything that can substitute bindings in a single string
pub trait TextResolver {
    /// Resolve every token in `text`
    fn resolve_text<'a>(&self, text: &'a str) -> Cow<'a, str>;

    /// False when there is no sample data (pass-through mode)
    fn has_data(&self) -> bool;
}

impl TextResolver for Option<&Value> {
    fn resolve_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        resolve(text, *self)
    }

    fn has_data(&self) -> bool {
        self.is_some()
    }
}

/// Split a template into literal and binding tokens
pub fn tokenize(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for cap in BINDING_RE.captures_iter(template) {
        let (Some(whole), Some(inner)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        if whole.start() > last_end {
            tokens.push(Token::Literal(last_end..whole.start()));
        }
        tokens.push(Token::Binding {
            span: whole.range(),
            path: trimmed_range(template, inner.range()),
        });
        last_end = whole.end();
    }

    if last_end < template.len() {
        tokens.push(Token::Literal(last_end..template.len()));
    }

    tokens
}

/// Narrow `range` so that it excludes surrounding whitespace
fn trimmed_range(text: &str, range: Range<usize>) -> Range<usize> {
    let inner = &text[range.clone()];
    let start = range.start + (inner.len() - inner.trim_start().len());
    let end = range.end - (inner.len() - inner.trim_end().len());
    if start > end {
        start..start
    } else {
        start..end
    }
}

/// Resolve all `{{path}}` tokens in `text` against `data`
///
/// Example: `resolve("Hi {{customer.name}}", Some(&json!({"customer": {"name": "John"}})))`
/// → `"Hi John"`
pub fn resolve<'a>(text: &'a str, data: Option<&Value>) -> Cow<'a, str> {
    let Some(data) = data else {
        return Cow::Borrowed(text);
    };
    if !text.contains("{{") {
        return Cow::Borrowed(text);
    }
    render_tokens(text, &tokenize(text), data)
}

/// Substitute pre-parsed tokens
fn render_tokens<'a>(text: &'a str, tokens: &[Token], data: &Value) -> Cow<'a, str> {
    if !tokens.iter().any(|t| matches!(t, Token::Binding { .. })) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 64);
    for token in tokens {
        match token {
            Token::Literal(range) => result.push_str(&text[range.clone()]),
            Token::Binding { path, .. } => {
                if let Some(value) = resolve_path(data, &text[path.clone()]) {
                    result.push_str(&value);
                }
            }
        }
    }
    Cow::Owned(result)
}

/// Resolve a single trimmed dot-path to its display string
///
/// `None` means unresolved: empty path, missing key, out-of-bounds index,
/// traversal through a scalar or null, or a terminal null.
pub fn resolve_path(data: &Value, path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    lookup(data, path).and_then(stringify)
}

/// Convert a JSON value to its substitution string
///
/// Strings verbatim, numbers in shortest form, containers as compact
/// JSON. Null has no string form.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(format_number(n)),
        container => {
            let mut out = String::new();
            write_compact(container, &mut out);
            Some(out)
        }
    }
}

/// Compact JSON with numbers in the same form as top-level values
fn write_compact(value: &Value, out: &mut String) {
    match value {
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => out.push_str(&Value::String(s.clone()).to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, child)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_compact(child, out);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Integral floats print without a fractional part (`3.0` → `3`)
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", f)
            }
        }
        _ => n.to_string(),
    }
}

/// List every complete binding in `text`
pub fn extract_refs(text: &str) -> Vec<BindingRef> {
    tokenize(text)
        .into_iter()
        .filter_map(|token| match token {
            Token::Binding { span, path } => Some(BindingRef {
                path: text[path].to_string(),
                span,
            }),
            Token::Literal(_) => None,
        })
        .collect()
}

/// Resolver object threaded through a render call
///
/// Holds the session's sample data and caches tokenized templates, so
/// repeated renders of the same prop tree only scan each string once.
/// `Send + Sync`: the cache is the only shared state and it is append-only.
pub struct BindingResolver {
    data: Option<Arc<Value>>,
    limits: Limits,
    cache: DashMap<String, Arc<Vec<Token>>>,
}

impl BindingResolver {
    pub fn new(data: Option<Arc<Value>>) -> Self {
        Self::with_limits(data, Limits::default())
    }

    pub fn with_limits(data: Option<Arc<Value>>, limits: Limits) -> Self {
        Self {
            data,
            limits,
            cache: DashMap::new(),
        }
    }

    /// The sample data, if any
    pub fn data(&self) -> Option<&Value> {
        self.data.as_deref()
    }

    /// Swap the sample data wholesale; the token cache stays valid
    pub fn set_data(&mut self, data: Option<Arc<Value>>) {
        self.data = data;
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parse template into tokens (with caching)
    pub fn tokenize(&self, template: &str) -> Arc<Vec<Token>> {
        if let Some(cached) = self.cache.get(template) {
            return Arc::clone(&cached);
        }
        let tokens = Arc::new(tokenize(template));
        self.cache.insert(template.to_string(), Arc::clone(&tokens));
        tokens
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Same semantics as [`resolve`], using the cache
    pub fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let Some(data) = self.data() else {
            return Cow::Borrowed(text);
        };
        if !text.contains("{{") {
            return Cow::Borrowed(text);
        }
        let tokens = self.tokenize(text);
        render_tokens(text, &tokens, data)
    }

    /// Same semantics as [`deep::resolve_deep`], with this resolver's depth limit
    pub fn resolve_deep(&self, node: &Value) -> Value {
        deep::resolve_deep_with(node, self, self.limits.max_depth)
    }

    /// Same semantics as [`deep::resolve_props`]
    pub fn resolve_props<T>(&self, props: &T) -> T
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        deep::resolve_props_with(props, self, self.limits.max_depth)
    }
}

impl TextResolver for BindingResolver {
    fn resolve_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.resolve(text)
    }

    fn has_data(&self) -> bool {
        self.data.is_some()
    }
}
