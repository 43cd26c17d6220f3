//! Errors surfaced to MCP callers.
//!
//! The core never fails on a missing key; the tool layer turns those sentinels, along
//! with argument validation failures, into [`ToolError`]s whose `Display` text is what
//! the caller sees.

use chrono::{DateTime, Utc};
use mnemos::memory::types::Metadata;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("workspace lock poisoned: {0}")]
    LockPoisoned(String),
}

impl ToolError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<ToolError> for String {
    fn from(err: ToolError) -> Self {
        err.to_string()
    }
}

/// Reject empty or whitespace-only text.
pub fn require_text(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Importance and thresholds must lie in `[0.0, 1.0]`.
pub fn unit_interval(field: &str, value: Option<f64>) -> Result<Option<f64>, ToolError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(ToolError::InvalidArgument(format!(
            "{field} must be between 0.0 and 1.0"
        ))),
        other => Ok(other),
    }
}

pub fn positive_limit(limit: Option<usize>) -> Result<Option<usize>, ToolError> {
    match limit {
        Some(0) => Err(ToolError::InvalidArgument("limit must be at least 1".into())),
        other => Ok(other),
    }
}

/// Parse an optional RFC 3339 timestamp.
pub fn timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, ToolError> {
    value
        .map(|v| {
            DateTime::parse_from_rfc3339(v)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    ToolError::InvalidArgument(format!("{field} is not an RFC 3339 timestamp: {e}"))
                })
        })
        .transpose()
}

/// Accept an optional JSON object argument.
pub fn object(field: &str, value: Option<serde_json::Value>) -> Result<Option<Metadata>, ToolError> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ToolError::InvalidArgument(format!(
            "{field} must be a JSON object"
        ))),
    }
}
