//! Core memory type definitions.
//!
//! Defines [`MemoryEntry`] (a stored memory with its ranking state), [`MemoryPatch`]
//! (partial updates), [`RecallQuery`] (recall filters), and the result shapes returned by
//! consolidation and statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Open key/value map used for entry metadata and graph properties.
///
/// Values may be strings, numbers, booleans, null, nested maps or sequences.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Importance assigned when the caller does not supply one.
pub const DEFAULT_IMPORTANCE: f64 = 0.5;

/// Clamp an importance into `[0.0, 1.0]`. NaN maps to the default.
pub fn clamp_importance(importance: f64) -> f64 {
    if importance.is_nan() {
        DEFAULT_IMPORTANCE
    } else {
        importance.clamp(0.0, 1.0)
    }
}

/// A memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    /// The full text content of the memory.
    pub content: String,
    /// Creation time. Never changes after `store`.
    pub timestamp: DateTime<Utc>,
    /// Optional grouping label (e.g. a project or session name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Weight in `[0.0, 1.0]`.
    #[serde(default = "default_importance")]
    pub importance: f64,
    /// Number of times this entry has been returned by a recall.
    #[serde(default)]
    pub access_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Metadata,
    /// IDs of entries linked by similarity, in link order.
    #[serde(default)]
    pub related_memories: Vec<String>,
    /// Knowledge graph entity this entry is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

fn default_importance() -> f64 {
    DEFAULT_IMPORTANCE
}

impl MemoryEntry {
    /// Context label, treating the empty string as absent.
    pub fn context_label(&self) -> Option<&str> {
        self.context.as_deref().filter(|c| !c.is_empty())
    }

    /// Add `id` to the related list unless already present.
    pub(crate) fn link(&mut self, id: &str) {
        if !self.related_memories.iter().any(|r| r == id) {
            self.related_memories.push(id.to_string());
        }
    }

    /// Remove `id` from the related list.
    pub(crate) fn unlink(&mut self, id: &str) {
        self.related_memories.retain(|r| r != id);
    }
}

/// Fields accepted by `store`.
#[derive(Debug, Clone, Default)]
pub struct NewMemory {
    pub content: String,
    pub context: Option<String>,
    pub tags: Vec<String>,
    pub importance: Option<f64>,
    pub metadata: Option<Metadata>,
}

impl NewMemory {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Partial update for an existing entry. `id` and `timestamp` cannot be changed.
///
/// Double options distinguish "leave unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct MemoryPatch {
    pub content: Option<String>,
    pub context: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub importance: Option<f64>,
    pub access_count: Option<u32>,
    pub last_accessed: Option<Option<DateTime<Utc>>>,
    pub metadata: Option<Metadata>,
    pub related_memories: Option<Vec<String>>,
    pub entity_id: Option<Option<String>>,
}

/// Inclusive time window; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| t >= s) && self.end.is_none_or(|e| t <= e)
    }
}

/// Conjunctive recall filters plus an optional free-text query.
#[derive(Debug, Clone, Default)]
pub struct RecallQuery {
    pub query: Option<String>,
    pub context: Option<String>,
    /// Matches entries carrying at least one of these tags.
    pub tags: Vec<String>,
    pub min_importance: Option<f64>,
    pub time_range: Option<TimeRange>,
    /// Falls back to the store's configured default when `None`.
    pub limit: Option<usize>,
}

/// A tag shared by more than one entry, found by consolidation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagPattern {
    pub tag: String,
    pub memory_ids: Vec<String>,
}

impl TagPattern {
    pub fn count(&self) -> usize {
        self.memory_ids.len()
    }
}

/// Result of `consolidate`.
#[derive(Debug, Clone, Serialize)]
pub struct Consolidation {
    pub patterns: Vec<TagPattern>,
    pub summary: String,
}

/// Result of `get_stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryStats {
    pub total_memories: usize,
    pub contexts: usize,
    pub tags: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_memory: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_memory: Option<DateTime<Utc>>,
    pub average_importance: f64,
}
