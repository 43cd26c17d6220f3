//! Entity and relationship storage with adjacency and type indices.
//!
//! Entities upsert by ID; relationships are append-only and are indexed under both
//! endpoints so traversal treats them as undirected. Nothing is removed except by
//! [`KnowledgeGraph::clear`].

use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::config::GraphConfig;
use crate::graph::types::{
    Entity, EntityMetadata, GraphEdge, GraphExport, GraphNode, GraphStats, RelatedEntity,
    Relationship, RelationshipMetadata,
};
use crate::memory::types::Metadata;

/// Render a property value as plain text. Strings are unquoted.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Non-empty scalar text usable as a display label.
fn label_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    pub(crate) config: GraphConfig,
    pub(crate) entities: HashMap<String, Entity>,
    pub(crate) relationships: HashMap<String, Relationship>,
    /// Entity IDs in first-insertion order. A re-add keeps its original position.
    pub(crate) entity_order: Vec<String>,
    /// Relationship IDs in creation order.
    pub(crate) relationship_order: Vec<String>,
    /// Entity ID → IDs of relationships touching it, in creation order.
    pub(crate) adjacency: HashMap<String, Vec<String>>,
    /// Entity type → entity IDs, in the order they joined the type.
    pub(crate) by_type: HashMap<String, Vec<String>>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Insert or replace an entity. `created` survives a re-add; `updated` is refreshed.
    pub fn add_entity(
        &mut self,
        entity_type: &str,
        properties: Metadata,
        id: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Entity {
        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
        let now = Utc::now();

        let created = match self.entities.get(&id) {
            Some(existing) => {
                if existing.entity_type != entity_type {
                    if let Some(ids) = self.by_type.get_mut(&existing.entity_type) {
                        ids.retain(|other| other != &id);
                        if ids.is_empty() {
                            self.by_type.remove(&existing.entity_type);
                        }
                    }
                }
                existing.metadata.created
            }
            None => {
                self.entity_order.push(id.clone());
                now
            }
        };

        let entity = Entity {
            id: id.clone(),
            entity_type: entity_type.to_string(),
            properties,
            metadata: EntityMetadata {
                created,
                updated: now,
                tags: tags.map(|t| t.into_iter().collect()),
            },
        };

        let same_type = self.by_type.entry(entity.entity_type.clone()).or_default();
        if !same_type.contains(&id) {
            same_type.push(id.clone());
        }
        self.entities.insert(id.clone(), entity.clone());

        debug!(id = %id, entity_type, "entity added");
        entity
    }

    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Every entity in creation order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entity_order
            .iter()
            .filter_map(|id| self.entities.get(id))
    }

    /// Every relationship in creation order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationship_order
            .iter()
            .filter_map(|id| self.relationships.get(id))
    }

    pub fn get_entities_by_type(&self, entity_type: &str) -> Vec<&Entity> {
        self.by_type
            .get(entity_type)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.get(id))
            .collect()
    }

    /// Create an edge between two existing entities.
    ///
    /// Returns `None` without mutating anything if either endpoint is missing.
    pub fn add_relationship(
        &mut self,
        source_id: &str,
        target_id: &str,
        relationship_type: &str,
        properties: Option<Metadata>,
        weight: Option<f64>,
    ) -> Option<Relationship> {
        if !self.entities.contains_key(source_id) || !self.entities.contains_key(target_id) {
            debug!(source_id, target_id, "relationship rejected: missing endpoint");
            return None;
        }

        let relationship = Relationship {
            id: uuid::Uuid::now_v7().to_string(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            relationship_type: relationship_type.to_string(),
            properties,
            metadata: RelationshipMetadata {
                created: Utc::now(),
                weight,
            },
        };

        for endpoint in [source_id, target_id] {
            let edges = self.adjacency.entry(endpoint.to_string()).or_default();
            if !edges.contains(&relationship.id) {
                edges.push(relationship.id.clone());
            }
        }
        self.relationship_order.push(relationship.id.clone());
        self.relationships
            .insert(relationship.id.clone(), relationship.clone());

        debug!(
            id = %relationship.id,
            source_id,
            target_id,
            relationship_type,
            "relationship added"
        );
        Some(relationship)
    }

    /// Relationships touching `entity_id`, in either direction.
    pub fn get_entity_relationships(&self, entity_id: &str) -> Vec<&Relationship> {
        self.adjacency
            .get(entity_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.relationships.get(id))
            .collect()
    }

    /// Neighbours of `entity_id` paired with the connecting relationship, optionally
    /// restricted to one relationship type.
    pub fn get_related_entities(
        &self,
        entity_id: &str,
        relationship_type: Option<&str>,
    ) -> Vec<RelatedEntity> {
        self.get_entity_relationships(entity_id)
            .into_iter()
            .filter(|r| relationship_type.is_none_or(|t| r.relationship_type == t))
            .filter_map(|r| {
                let other = self.entities.get(r.other_endpoint(entity_id))?;
                Some(RelatedEntity {
                    entity: other.clone(),
                    relationship: r.clone(),
                })
            })
            .collect()
    }

    pub fn get_stats(&self) -> GraphStats {
        let mut entity_types = BTreeMap::new();
        for entity in self.entities() {
            *entity_types.entry(entity.entity_type.clone()).or_insert(0) += 1;
        }

        GraphStats {
            entity_count: self.entities.len(),
            relationship_count: self.relationships.len(),
            entity_types,
        }
    }

    /// Display projection: labels fall back `name` → `title` → ID.
    pub fn export_graph(&self) -> GraphExport {
        let nodes = self
            .entities()
            .map(|e| GraphNode {
                id: e.id.clone(),
                entity_type: e.entity_type.clone(),
                label: label_text(e.properties.get("name"))
                    .or_else(|| label_text(e.properties.get("title")))
                    .unwrap_or_else(|| e.id.clone()),
                properties: e.properties.clone(),
            })
            .collect();

        let edges = self
            .relationships()
            .map(|r| GraphEdge {
                id: r.id.clone(),
                source: r.source_id.clone(),
                target: r.target_id.clone(),
                relationship_type: r.relationship_type.clone(),
                weight: r.metadata.weight,
            })
            .collect();

        GraphExport { nodes, edges }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.relationships.clear();
        self.entity_order.clear();
        self.relationship_order.clear();
        self.adjacency.clear();
        self.by_type.clear();
    }
}
