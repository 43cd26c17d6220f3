//! Scoring functions shared by the write and read paths.
//!
//! - [`similarity`] drives auto-linking on store.
//! - [`relevance`] ranks query-driven recalls.
//! - [`composite_score`] ranks recalls without a query (recency + importance + usage).

use chrono::{DateTime, Utc};

use crate::memory::types::MemoryEntry;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Similarity in `[0.0, 1.0]` between two entries.
///
/// Half the weight comes from a shared non-empty context, half from tag overlap
/// relative to the larger tag set.
pub fn similarity(a: &MemoryEntry, b: &MemoryEntry) -> f64 {
    let mut score = 0.0;

    if let (Some(ca), Some(cb)) = (a.context_label(), b.context_label()) {
        if ca == cb {
            score += 0.5;
        }
    }

    if !a.tags.is_empty() && !b.tags.is_empty() {
        let common = a.tags.intersection(&b.tags).count();
        let larger = a.tags.len().max(b.tags.len());
        score += 0.5 * (common as f64 / larger as f64);
    }

    score
}

/// Query relevance. `query` must already be lowercase.
///
/// Returns 0.0 when neither content, tags nor context contain the query; the
/// importance and access multipliers never rescue a miss.
pub fn relevance(entry: &MemoryEntry, query: &str) -> f64 {
    let mut base = 0.0;

    if entry.content.to_lowercase().contains(query) {
        base += 1.0;
    }
    for tag in &entry.tags {
        if tag.to_lowercase().contains(query) {
            base += 0.5;
        }
    }
    if let Some(context) = entry.context.as_deref() {
        if context.to_lowercase().contains(query) {
            base += 0.5;
        }
    }

    if base <= 0.0 {
        return 0.0;
    }

    let usage = 1.0 + (f64::from(entry.access_count) + 1.0).ln() * 0.1;
    base * (1.0 + entry.importance) * usage
}

/// Query-independent ranking score at time `now`.
///
/// `0.4 * e^(-age / half_life) + 0.4 * importance + 0.2 * min(access_count / 10, 1)`
pub fn composite_score(entry: &MemoryEntry, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    let age_ms = (now - entry.timestamp).num_milliseconds() as f64;
    let recency = (-age_ms / (half_life_days * MS_PER_DAY)).exp();
    let frequency = (f64::from(entry.access_count) / 10.0).min(1.0);

    0.4 * recency + 0.4 * entry.importance + 0.2 * frequency
}
