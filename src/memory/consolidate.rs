//! Tag pattern mining and a textual summary of the most important entries.

use std::collections::BTreeMap;
use tracing::debug;

use crate::memory::store::MemoryStore;
use crate::memory::types::{Consolidation, MemoryEntry, TagPattern};

/// Truncate content to `max_chars` characters, appending "..." if truncated.
pub(crate) fn truncate(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &content[..end]),
        None => content.to_string(),
    }
}

impl MemoryStore {
    /// Mine tag patterns and summarise, optionally restricted to one context.
    ///
    /// Read-only: no access is recorded on the entries it inspects.
    pub fn consolidate(&self, context: Option<&str>) -> Consolidation {
        let context = context.filter(|c| !c.is_empty());
        let entries: Vec<&MemoryEntry> = self
            .iter()
            .filter(|e| context.is_none_or(|c| e.context_label() == Some(c)))
            .collect();

        let patterns = tag_patterns(&entries);
        let summary = self.summarize(&entries);

        debug!(
            context = context.unwrap_or(""),
            entries = entries.len(),
            patterns = patterns.len(),
            "consolidated"
        );

        Consolidation { patterns, summary }
    }

    fn summarize(&self, entries: &[&MemoryEntry]) -> String {
        let mut key: Vec<&MemoryEntry> = entries.to_vec();
        key.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        let mut summary = format!("Total memories: {}\n", entries.len());
        if key.is_empty() {
            return summary;
        }

        summary.push_str("\nKey memories:\n");
        for entry in key.into_iter().take(self.config.summary_top) {
            summary.push_str(&format!(
                "- [{}] {}\n",
                entry.timestamp.format("%Y-%m-%d"),
                truncate(&entry.content, self.config.preview_chars)
            ));
        }
        summary
    }
}

/// Group entry IDs by tag, keep tags shared by more than one entry, largest first.
fn tag_patterns(entries: &[&MemoryEntry]) -> Vec<TagPattern> {
    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in entries {
        for tag in &entry.tags {
            groups.entry(tag.as_str()).or_default().push(entry.id.clone());
        }
    }

    let mut patterns: Vec<TagPattern> = groups
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .map(|(tag, memory_ids)| TagPattern {
            tag: tag.to_string(),
            memory_ids,
        })
        .collect();
    patterns.sort_by(|a, b| b.count().cmp(&a.count()));
    patterns
}
