//! Bindery Configuration
//!
//! Tunables for resolution and the interactive editor.
//! Config is read from `bindery.yaml` in the working directory (or an
//! explicit path).
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`BINDERY_DEBOUNCE_MS`, `BINDERY_MAX_DEPTH`,
//!    `BINDERY_MAX_SUGGESTIONS`)
//! 2. Config file
//! 3. Defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BinderyError, Result};

/// Default recursion guard for deep resolution
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default debounce window for the suggestion popup
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = "bindery.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderyConfig {
    /// Quiet time before the suggestion popup opens
    pub debounce_ms: u64,

    #[serde(flatten)]
    pub limits: Limits,

    /// Max characters of a value preview in the popup
    pub preview_width: usize,
}

impl Default for BinderyConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            limits: Limits::default(),
            preview_width: 40,
        }
    }
}

/// Resource limits for resolution and indexing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting walked by deep resolution
    pub max_depth: usize,

    /// Maximum suggestions shown in the popup
    pub max_suggestions: usize,

    /// Maximum sample-data nodes visited when building suggestions
    pub max_index_nodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_suggestions: 20,
            max_index_nodes: 10_000,
        }
    }
}

impl Limits {
    /// Create limits suitable for testing (more restrictive)
    pub fn testing() -> Self {
        Self {
            max_depth: 8,
            max_suggestions: 5,
            max_index_nodes: 100,
        }
    }
}

impl BinderyConfig {
    /// Default config file location
    pub fn config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE)
    }

    /// Load configuration from the default location
    ///
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a file
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| BinderyError::ConfigError {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text (empty text = defaults)
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| BinderyError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    /// Unparsable values are ignored.
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ms) = parse_var(&get, "BINDERY_DEBOUNCE_MS") {
            self.debounce_ms = ms;
        }
        if let Some(depth) = parse_var(&get, "BINDERY_MAX_DEPTH") {
            self.limits.max_depth = depth;
        }
        if let Some(max) = parse_var(&get, "BINDERY_MAX_SUGGESTIONS") {
            self.limits.max_suggestions = max;
        }
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn parse_var<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = get(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BinderyConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.limits.max_depth, 256);
        assert_eq!(config.limits.max_suggestions, 20);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = BinderyConfig::from_yaml("debounce_ms: 80\nmax_suggestions: 3\n").unwrap();
        assert_eq!(config.debounce_ms, 80);
        assert_eq!(config.limits.max_suggestions, 3);
        assert_eq!(config.limits.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.preview_width, 40);
    }

    #[test]
    fn test_malformed_yaml_is_config_error() {
        let err = BinderyConfig::from_yaml("debounce_ms: [oops").unwrap_err();
        assert!(matches!(err, BinderyError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = BinderyConfig::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, BinderyConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "max_depth: 12\npreview_width: 10\n").unwrap();
        let config = BinderyConfig::load_from(&path).unwrap();
        assert_eq!(config.limits.max_depth, 12);
        assert_eq!(config.preview_width, 10);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BINDERY_DEBOUNCE_MS", "20"),
            ("BINDERY_MAX_DEPTH", "not-a-number"),
            ("BINDERY_MAX_SUGGESTIONS", " 7 "),
        ]
        .into_iter()
        .collect();
        let config = BinderyConfig::default()
            .with_vars(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.debounce_ms, 20);
        assert_eq!(config.limits.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.limits.max_suggestions, 7);
    }
}
