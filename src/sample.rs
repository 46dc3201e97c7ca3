//! Sample data loading
//!
//! Sample data is one JSON or YAML document, picked by file extension.
//! YAML is converted to the same `serde_json::Value` tree, so mapping
//! key order is kept.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{BinderyError, Result};

/// Supported sample data encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Json,
    Yaml,
}

impl SampleFormat {
    /// Detect from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(BinderyError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Parse sample data text in the given format
pub fn parse_sample_data(content: &str, format: SampleFormat, origin: &str) -> Result<Value> {
    let parsed = match format {
        SampleFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        SampleFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|details| BinderyError::SampleDataParse {
        path: origin.to_string(),
        details,
    })
}

/// Load a sample data file, ready to share into a session
pub async fn load_sample_data(path: &Path) -> Result<Arc<Value>> {
    let format = SampleFormat::from_path(path)?;
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BinderyError::SampleDataNotFound {
                path: path.display().to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let value = parse_sample_data(&content, format, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), ?format, "sample data loaded");
    Ok(Arc::new(value))
}
