//! Free-text entity search.
//!
//! Matching is case-insensitive and short-circuits in this order:
//! 1. the entity type contains the query,
//! 2. any property value (rendered as text) contains the query,
//! 3. any of the entity's own tags contains the query.
//!
//! Only a candidate that misses all three falls through to the `tags` filter, where it
//! matches if it carries every filter tag. The filter is therefore not a pre-filter on
//! query hits.

use crate::graph::store::{value_text, KnowledgeGraph};
use crate::graph::types::Entity;

impl KnowledgeGraph {
    pub fn search_entities(
        &self,
        query: &str,
        entity_type: Option<&str>,
        tags: Option<&[String]>,
    ) -> Vec<&Entity> {
        let needle = query.to_lowercase();

        let candidates: Vec<&Entity> = match entity_type {
            Some(t) => self.get_entities_by_type(t),
            None => self.entities().collect(),
        };

        candidates
            .into_iter()
            .filter(|e| matches_entity(e, &needle, tags))
            .collect()
    }
}

fn matches_entity(entity: &Entity, needle: &str, tags: Option<&[String]>) -> bool {
    if entity.entity_type.to_lowercase().contains(needle) {
        return true;
    }
    if entity
        .properties
        .values()
        .any(|v| value_text(v).to_lowercase().contains(needle))
    {
        return true;
    }
    if entity.tags().any(|t| t.to_lowercase().contains(needle)) {
        return true;
    }

    match tags {
        Some(filter) if !filter.is_empty() => filter.iter().all(|t| entity.has_tag(t)),
        _ => false,
    }
}
