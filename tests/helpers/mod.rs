#![allow(dead_code)]

use chrono::{DateTime, Utc};
use mnemos::graph::types::Entity;
use mnemos::graph::KnowledgeGraph;
use mnemos::memory::types::{MemoryEntry, Metadata, NewMemory};
use mnemos::memory::MemoryStore;
use serde_json::json;
use std::collections::HashSet;

/// Store a memory with the common fields set. Returns the stored entry.
pub fn remember(
    store: &mut MemoryStore,
    content: &str,
    context: Option<&str>,
    tags: &[&str],
    importance: f64,
) -> MemoryEntry {
    let mut new = NewMemory::new(content)
        .tags(tags.iter().copied())
        .importance(importance);
    if let Some(context) = context {
        new = new.context(context);
    }
    store.store(new)
}

/// Copy `entry` with its creation time moved to `timestamp`.
pub fn backdated(entry: &MemoryEntry, timestamp: DateTime<Utc>) -> MemoryEntry {
    MemoryEntry {
        timestamp,
        ..entry.clone()
    }
}

/// Assert that the context and tag indices are exactly the derived view of the entries.
pub fn assert_index_consistent(store: &MemoryStore) {
    let index = store.index();

    for context in index.contexts() {
        let indexed = index.context_ids(context).cloned().unwrap_or_default();
        let actual: HashSet<String> = store
            .iter()
            .filter(|e| e.context.as_deref() == Some(context))
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(indexed, actual, "context index drifted for {context:?}");
    }
    for tag in index.tags() {
        let indexed = index.tag_ids(tag).cloned().unwrap_or_default();
        let actual: HashSet<String> = store
            .iter()
            .filter(|e| e.tags.contains(tag))
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(indexed, actual, "tag index drifted for {tag:?}");
    }

    for entry in store.iter() {
        if let Some(context) = entry.context_label() {
            assert!(
                index.context_ids(context).is_some_and(|ids| ids.contains(&entry.id)),
                "entry {} missing from context index",
                entry.id
            );
        }
        for tag in &entry.tags {
            assert!(
                index.tag_ids(tag).is_some_and(|ids| ids.contains(&entry.id)),
                "entry {} missing from tag index",
                entry.id
            );
        }
    }
}

/// Assert that `related_memories` is symmetric across the whole store.
pub fn assert_links_symmetric(store: &MemoryStore) {
    for a in store.iter() {
        for b_id in &a.related_memories {
            let b = store.get(b_id).expect("related id points at a live entry");
            assert!(
                b.related_memories.contains(&a.id),
                "{} links to {} but not back",
                a.id,
                b.id
            );
        }
    }
}

/// Add a `Service` entity named `name` with id `name`.
pub fn service(graph: &mut KnowledgeGraph, name: &str) -> Entity {
    let mut properties = Metadata::new();
    properties.insert("name".into(), json!(name));
    graph.add_entity("Service", properties, Some(name.to_string()), None)
}
