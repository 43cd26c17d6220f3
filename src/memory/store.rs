//! Write path: the entry map, its derived indices and similarity linking.
//!
//! [`MemoryStore`] owns every entry plus three derived views: entries by context, entries
//! by tag, and the insertion-ordered timeline. Every mutation goes through
//! [`MemoryIndex::insert`]/[`MemoryIndex::remove`] so the views never drift from the map.
//!
//! [`MemoryStore::store`] runs in two phases: insert + index, then a linking pass that
//! compares the new entry against every existing one. The pass is O(n) per store and the
//! store has no capacity bound.

use chrono::Utc;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::config::MemoryConfig;
use crate::memory::scoring::similarity;
use crate::memory::types::{clamp_importance, MemoryEntry, MemoryPatch, NewMemory, DEFAULT_IMPORTANCE};

/// Context and tag indices, derived from the entry map.
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    by_context: HashMap<String, HashSet<String>>,
    by_tag: HashMap<String, HashSet<String>>,
}

impl MemoryIndex {
    /// Index `entry` under its current context and tags.
    pub(crate) fn insert(&mut self, entry: &MemoryEntry) {
        if let Some(context) = entry.context_label() {
            self.by_context
                .entry(context.to_string())
                .or_default()
                .insert(entry.id.clone());
        }
        for tag in &entry.tags {
            self.by_tag
                .entry(tag.clone())
                .or_default()
                .insert(entry.id.clone());
        }
    }

    /// Remove `entry` from the index using its current context and tags.
    /// Empty buckets are dropped so distinct counts stay exact.
    pub(crate) fn remove(&mut self, entry: &MemoryEntry) {
        if let Some(context) = entry.context_label() {
            remove_from_bucket(&mut self.by_context, context, &entry.id);
        }
        for tag in &entry.tags {
            remove_from_bucket(&mut self.by_tag, tag, &entry.id);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.by_context.clear();
        self.by_tag.clear();
    }

    /// IDs of entries whose context equals `context`.
    pub fn context_ids(&self, context: &str) -> Option<&HashSet<String>> {
        self.by_context.get(context)
    }

    /// IDs of entries tagged with `tag`.
    pub fn tag_ids(&self, tag: &str) -> Option<&HashSet<String>> {
        self.by_tag.get(tag)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.by_context.keys().map(String::as_str)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.by_tag.keys().map(String::as_str)
    }

    pub fn context_count(&self) -> usize {
        self.by_context.len()
    }

    pub fn tag_count(&self) -> usize {
        self.by_tag.len()
    }
}

fn remove_from_bucket(map: &mut HashMap<String, HashSet<String>>, key: &str, id: &str) {
    if let Some(bucket) = map.get_mut(key) {
        bucket.remove(id);
        if bucket.is_empty() {
            map.remove(key);
        }
    }
}

/// Collect caller-supplied tags into a set, dropping empty labels.
fn tag_set<I: IntoIterator<Item = String>>(tags: I) -> BTreeSet<String> {
    tags.into_iter().filter(|t| !t.is_empty()).collect()
}

fn context_label(context: Option<String>) -> Option<String> {
    context.filter(|c| !c.is_empty())
}

/// In-process memory store. See the module docs for the index layout.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) config: MemoryConfig,
    pub(crate) entries: HashMap<String, MemoryEntry>,
    pub(crate) index: MemoryIndex,
    /// Entry IDs in insertion order.
    pub(crate) timeline: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry without recording an access.
    pub fn get(&self, id: &str) -> Option<&MemoryEntry> {
        self.entries.get(id)
    }

    /// All entries in insertion order, without recording access.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.timeline.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn index(&self) -> &MemoryIndex {
        &self.index
    }

    /// Store a new entry, then link it to every sufficiently similar existing entry.
    pub fn store(&mut self, new: NewMemory) -> MemoryEntry {
        let entry = MemoryEntry {
            id: uuid::Uuid::now_v7().to_string(),
            content: new.content,
            timestamp: Utc::now(),
            context: context_label(new.context),
            tags: tag_set(new.tags),
            importance: clamp_importance(new.importance.unwrap_or(DEFAULT_IMPORTANCE)),
            access_count: 0,
            last_accessed: None,
            metadata: new.metadata.unwrap_or_default(),
            related_memories: Vec::new(),
            entity_id: None,
        };
        let id = entry.id.clone();
        let mut stored = entry.clone();

        // Phase 1: insert + index
        self.index.insert(&entry);
        self.timeline.push(id.clone());
        self.entries.insert(id.clone(), entry);

        // Phase 2: similarity links
        stored.related_memories = self.link_matches(&id);
        debug!(
            id = %id,
            linked = stored.related_memories.len(),
            total = self.entries.len(),
            "memory stored"
        );
        stored
    }

    /// Link `id` symmetrically with every other entry whose similarity exceeds the
    /// configured threshold. Idempotent. Returns the number of matches.
    pub fn link_similar(&mut self, id: &str) -> usize {
        self.link_matches(id).len()
    }

    fn link_matches(&mut self, id: &str) -> Vec<String> {
        let Some(subject) = self.entries.get(id) else {
            return Vec::new();
        };
        let threshold = self.config.link_threshold;

        let matches: Vec<String> = self
            .timeline
            .iter()
            .filter(|other| other.as_str() != id)
            .filter_map(|other| self.entries.get(other))
            .filter(|other| similarity(subject, other) > threshold)
            .map(|other| other.id.clone())
            .collect();

        for other in &matches {
            if let Some(entry) = self.entries.get_mut(other) {
                entry.link(id);
            }
        }
        if let Some(entry) = self.entries.get_mut(id) {
            for other in &matches {
                entry.link(other);
            }
        }

        matches
    }

    /// Merge `patch` into an existing entry, re-indexing around the change.
    ///
    /// Does not re-run similarity linking and does not keep `related_memories`
    /// symmetric. Returns `None` for an unknown ID.
    pub fn update(&mut self, id: &str, patch: MemoryPatch) -> Option<MemoryEntry> {
        let entry = self.entries.get_mut(id)?;

        self.index.remove(entry);

        if let Some(content) = patch.content {
            entry.content = content;
        }
        if let Some(context) = patch.context {
            entry.context = context_label(context);
        }
        if let Some(tags) = patch.tags {
            entry.tags = tag_set(tags);
        }
        if let Some(importance) = patch.importance {
            entry.importance = clamp_importance(importance);
        }
        if let Some(access_count) = patch.access_count {
            entry.access_count = access_count;
        }
        if let Some(last_accessed) = patch.last_accessed {
            entry.last_accessed = last_accessed;
        }
        if let Some(metadata) = patch.metadata {
            entry.metadata = metadata;
        }
        if let Some(related) = patch.related_memories {
            let mut deduped: Vec<String> = Vec::with_capacity(related.len());
            for r in related {
                if !deduped.contains(&r) {
                    deduped.push(r);
                }
            }
            entry.related_memories = deduped;
        }
        if let Some(entity_id) = patch.entity_id {
            entry.entity_id = entity_id;
        }

        self.index.insert(entry);
        debug!(id = %id, "memory updated");
        Some(entry.clone())
    }

    /// Remove an entry and scrub its ID from every remaining `related_memories` list.
    /// Returns `false` for an unknown ID.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(entry) = self.entries.remove(id) else {
            return false;
        };

        self.index.remove(&entry);
        self.timeline.retain(|t| t != id);

        for related in &entry.related_memories {
            if let Some(other) = self.entries.get_mut(related) {
                other.unlink(id);
            }
        }
        // Links added through `update` can be one-sided; sweep the rest.
        for other in self.entries.values_mut() {
            other.unlink(id);
        }

        debug!(id = %id, "memory deleted");
        true
    }

    /// Snapshot of every entry in insertion order.
    pub fn export(&self) -> Vec<MemoryEntry> {
        self.iter().cloned().collect()
    }

    /// Upsert entries by ID. No linking pass is run. Returns the number of entries written.
    pub fn import(&mut self, entries: Vec<MemoryEntry>) -> usize {
        let mut written = 0;
        for mut entry in entries {
            entry.importance = clamp_importance(entry.importance);
            entry.context = context_label(entry.context.take());
            entry.tags = tag_set(std::mem::take(&mut entry.tags));
            let mut seen = HashSet::new();
            entry
                .related_memories
                .retain(|r| r != &entry.id && seen.insert(r.clone()));

            match self.entries.get(&entry.id) {
                Some(existing) => self.index.remove(existing),
                None => self.timeline.push(entry.id.clone()),
            }
            self.index.insert(&entry);
            self.entries.insert(entry.id.clone(), entry);
            written += 1;
        }
        debug!(written, total = self.entries.len(), "memories imported");
        written
    }

    /// Remove every entry and reset all indices.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.timeline.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new(content: &str, context: Option<&str>, tags: &[&str]) -> NewMemory {
        let mut m = NewMemory::new(content).tags(tags.iter().copied());
        if let Some(c) = context {
            m = m.context(c);
        }
        m
    }

    #[test]
    fn test_store_defaults() {
        let mut store = MemoryStore::new();
        let entry = store.store(NewMemory::new("Rust is a systems language"));

        assert_eq!(entry.importance, 0.5);
        assert_eq!(entry.access_count, 0);
        assert!(entry.tags.is_empty());
        assert!(entry.last_accessed.is_none());
        assert!(entry.related_memories.is_empty());
        assert_eq!(store.len(), 1);
        assert_eq!(store.timeline, vec![entry.id.clone()]);
    }

    #[test]
    fn test_store_clamps_importance() {
        let mut store = MemoryStore::new();
        let high = store.store(NewMemory::new("a").importance(3.0));
        let low = store.store(NewMemory::new("b").importance(-1.0));
        assert_eq!(high.importance, 1.0);
        assert_eq!(low.importance, 0.0);
    }

    #[test]
    fn test_store_indexes_context_and_tags() {
        let mut store = MemoryStore::new();
        let entry = store.store(new("x", Some("ops"), &["infra", "k8s"]));

        assert!(store.index.context_ids("ops").unwrap().contains(&entry.id));
        assert!(store.index.tag_ids("infra").unwrap().contains(&entry.id));
        assert!(store.index.tag_ids("k8s").unwrap().contains(&entry.id));
    }

    #[test]
    fn test_store_links_similar_entries() {
        let mut store = MemoryStore::new();
        let x = store.store(new("X", Some("c"), &["t"]).importance(0.9));
        let y = store.store(new("Y", Some("c"), &["t"]).importance(0.5));

        assert_eq!(y.related_memories, vec![x.id.clone()]);
        assert_eq!(store.get(&x.id).unwrap().related_memories, vec![y.id.clone()]);
    }

    #[test]
    fn test_store_threshold_is_strict() {
        let mut store = MemoryStore::new();
        // Same context, no tags: similarity exactly 0.5, not linked
        let a = store.store(new("a", Some("c"), &[]));
        let b = store.store(new("b", Some("c"), &[]));
        assert!(b.related_memories.is_empty());
        assert!(store.get(&a.id).unwrap().related_memories.is_empty());
    }

    #[test]
    fn test_store_returns_linked_entry() {
        let mut store = MemoryStore::new();
        let a = store.store(new("a", Some("c"), &["t"]));
        store.store(new("unrelated", Some("other"), &["x"]));
        let c = store.store(new("c", Some("c"), &["t", "u"]));

        assert_eq!(c.related_memories, vec![a.id.clone()]);
        assert_eq!(store.get(&c.id), Some(&c));
    }

    #[test]
    fn test_link_similar_is_idempotent() {
        let mut store = MemoryStore::new();
        let a = store.store(new("a", Some("c"), &["t"]));
        let b = store.store(new("b", Some("c"), &["t"]));

        store.link_similar(&b.id);
        store.link_similar(&a.id);

        assert_eq!(store.get(&a.id).unwrap().related_memories, vec![b.id.clone()]);
        assert_eq!(store.get(&b.id).unwrap().related_memories, vec![a.id.clone()]);
    }

    #[test]
    fn test_update_reindexes() {
        let mut store = MemoryStore::new();
        let entry = store.store(new("x", Some("old"), &["a", "b"]));

        let updated = store
            .update(
                &entry.id,
                MemoryPatch {
                    context: Some(Some("new".into())),
                    tags: Some(vec!["b".into(), "c".into()]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.context.as_deref(), Some("new"));
        assert!(store.index.context_ids("old").is_none());
        assert!(store.index.context_ids("new").unwrap().contains(&entry.id));
        assert!(store.index.tag_ids("a").is_none());
        assert!(store.index.tag_ids("b").unwrap().contains(&entry.id));
        assert!(store.index.tag_ids("c").unwrap().contains(&entry.id));
    }

    #[test]
    fn test_update_can_clear_context() {
        let mut store = MemoryStore::new();
        let entry = store.store(new("x", Some("ops"), &[]));

        let updated = store
            .update(
                &entry.id,
                MemoryPatch {
                    context: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(updated.context.is_none());
        assert_eq!(store.index.context_count(), 0);
    }

    #[test]
    fn test_update_preserves_id_and_timestamp() {
        let mut store = MemoryStore::new();
        let entry = store.store(NewMemory::new("before"));

        let updated = store
            .update(
                &entry.id,
                MemoryPatch {
                    content: Some("after".into()),
                    importance: Some(7.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, entry.id);
        assert_eq!(updated.timestamp, entry.timestamp);
        assert_eq!(updated.content, "after");
        assert_eq!(updated.importance, 1.0);
    }

    #[test]
    fn test_update_unknown_returns_none() {
        let mut store = MemoryStore::new();
        assert!(store.update("nope", MemoryPatch::default()).is_none());
    }

    #[test]
    fn test_update_does_not_relink() {
        let mut store = MemoryStore::new();
        let a = store.store(new("a", Some("c1"), &["t1"]));
        let b = store.store(new("b", Some("c2"), &["t2"]));

        store.update(
            &b.id,
            MemoryPatch {
                context: Some(Some("c1".into())),
                tags: Some(vec!["t1".into()]),
                ..Default::default()
            },
        );

        assert!(store.get(&a.id).unwrap().related_memories.is_empty());
        assert!(store.get(&b.id).unwrap().related_memories.is_empty());
    }

    #[test]
    fn test_delete_cleans_indices_and_links() {
        let mut store = MemoryStore::new();
        let a = store.store(new("a", Some("c"), &["t"]));
        let b = store.store(new("b", Some("c"), &["t"]));

        assert!(store.delete(&a.id));
        assert!(!store.delete(&a.id));

        assert!(store.get(&a.id).is_none());
        assert!(!store.timeline.contains(&a.id));
        assert!(!store.index.context_ids("c").unwrap().contains(&a.id));
        assert!(!store.index.tag_ids("t").unwrap().contains(&a.id));
        assert!(store.get(&b.id).unwrap().related_memories.is_empty());
    }

    #[test]
    fn test_delete_removes_one_sided_links() {
        let mut store = MemoryStore::new();
        let a = store.store(NewMemory::new("a"));
        let b = store.store(NewMemory::new("b"));

        store.update(
            &b.id,
            MemoryPatch {
                related_memories: Some(vec![a.id.clone()]),
                ..Default::default()
            },
        );
        store.delete(&a.id);

        assert!(store.get(&b.id).unwrap().related_memories.is_empty());
    }

    #[test]
    fn test_import_upserts_without_linking() {
        let mut store = MemoryStore::new();
        let a = store.store(new("a", Some("c"), &["t"]));

        let mut other = MemoryStore::new();
        let mut replacement = a.clone();
        replacement.context = Some("d".into());
        let fresh = MemoryEntry {
            id: "imported-1".into(),
            context: Some("d".into()),
            ..replacement.clone()
        };

        other.import(vec![a.clone()]);
        assert_eq!(other.import(vec![replacement, fresh]), 2);

        assert_eq!(other.len(), 2);
        assert!(other.index.context_ids("c").is_none());
        assert_eq!(other.index.context_ids("d").unwrap().len(), 2);
        assert!(other.get("imported-1").unwrap().related_memories.is_empty());
        let order: Vec<&str> = other.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec![a.id.as_str(), "imported-1"]);
    }

    #[test]
    fn test_export_in_insertion_order() {
        let mut store = MemoryStore::new();
        let ids: Vec<String> = (0..4)
            .map(|i| store.store(NewMemory::new(format!("m{i}"))).id)
            .collect();

        let exported: Vec<String> = store.export().into_iter().map(|e| e.id).collect();
        assert_eq!(exported, ids);
    }

    #[test]
    fn test_clear() {
        let mut store = MemoryStore::new();
        store.store(new("a", Some("c"), &["t"]));
        store.clear();

        assert!(store.is_empty());
        assert!(store.timeline.is_empty());
        assert_eq!(store.index.context_count(), 0);
        assert_eq!(store.index.tag_count(), 0);
    }
}
