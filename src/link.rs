//! Links between memory entries and knowledge graph entities.
//!
//! A memory entry may name one entity through its `entity_id` field. Neither side
//! cascades: deleting an entry leaves the entity alone, and clearing the graph leaves
//! dangling `entity_id`s on entries, which lookups here simply fail to resolve.

use crate::graph::store::KnowledgeGraph;
use crate::graph::types::Entity;
use crate::memory::store::MemoryStore;
use crate::memory::types::{MemoryEntry, MemoryPatch};

/// Set (or clear, with `None`) the entity an entry is linked to.
///
/// Returns `None` if the entry does not exist. The entity is not required to exist.
pub fn link_memory(
    store: &mut MemoryStore,
    entry_id: &str,
    entity_id: Option<&str>,
) -> Option<MemoryEntry> {
    store.update(
        entry_id,
        MemoryPatch {
            entity_id: Some(entity_id.map(str::to_string)),
            ..Default::default()
        },
    )
}

/// Entries linked to `entity_id`, in insertion order. Does not record access.
pub fn memories_for_entity<'a>(store: &'a MemoryStore, entity_id: &str) -> Vec<&'a MemoryEntry> {
    store
        .iter()
        .filter(|e| e.entity_id.as_deref() == Some(entity_id))
        .collect()
}

/// The entity an entry is linked to, if both still exist.
pub fn entity_for_memory<'a>(
    store: &MemoryStore,
    graph: &'a KnowledgeGraph,
    entry_id: &str,
) -> Option<&'a Entity> {
    let entity_id = store.get(entry_id)?.entity_id.as_deref()?;
    graph.get_entity(entity_id)
}
