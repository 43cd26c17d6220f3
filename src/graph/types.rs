//! Knowledge graph type definitions.
//!
//! [`Entity`] is a typed node with open properties; [`Relationship`] is a typed edge that
//! keeps its direction for display but is traversed both ways.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::memory::types::Metadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Set on first insert; preserved when the entity is re-added.
    pub created: DateTime<Utc>,
    /// Refreshed on every `add_entity` call for this ID.
    pub updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
}

/// A typed node in the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub properties: Metadata,
    pub metadata: EntityMetadata,
}

impl Entity {
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.metadata.tags.iter().flatten().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.as_ref().is_some_and(|t| t.contains(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMetadata {
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// A directed, typed edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Metadata>,
    pub metadata: RelationshipMetadata,
}

impl Relationship {
    /// The endpoint that is not `entity_id`. For a self-loop this is `entity_id` itself.
    pub fn other_endpoint(&self, entity_id: &str) -> &str {
        if self.source_id == entity_id {
            &self.target_id
        } else {
            &self.source_id
        }
    }
}

/// A neighbour returned by `get_related_entities`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedEntity {
    pub entity: Entity,
    pub relationship: Relationship,
}

/// One path found by `find_paths`: entity IDs from source to target and the
/// relationship IDs traversed between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPath {
    pub entities: Vec<String>,
    pub relationships: Vec<String>,
}

/// Result of `find_paths`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathSearch {
    /// Every entity on any recorded path, deduplicated, in discovery order.
    pub entities: Vec<Entity>,
    /// Every relationship on any recorded path, deduplicated, in discovery order.
    pub relationships: Vec<Relationship>,
    pub paths: Vec<GraphPath>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub entity_count: usize,
    pub relationship_count: usize,
    pub entity_types: BTreeMap<String, usize>,
}

/// Display projection of an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub label: String,
    pub properties: Metadata,
}

/// Display projection of a relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub relationship_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphExport {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
