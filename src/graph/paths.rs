//! Breadth-first path enumeration between two entities.
//!
//! Nodes are marked visited when dequeued, not when enqueued, so several partial paths
//! to the same node can sit in the frontier at once; a node is expanded at most once.
//! Reaching the target records the path and ends that branch. Branches stop expanding
//! once their depth reaches `max_depth`.

use std::collections::{HashSet, VecDeque};
use tracing::debug;

use crate::graph::store::KnowledgeGraph;
use crate::graph::types::{GraphPath, PathSearch};

/// A partial path waiting in the frontier.
struct Frontier {
    entity_id: String,
    entities: Vec<String>,
    relationships: Vec<String>,
    depth: usize,
}

impl KnowledgeGraph {
    /// [`find_paths`](Self::find_paths) with the configured default depth.
    pub fn find_paths_default(&self, source_id: &str, target_id: &str) -> PathSearch {
        self.find_paths(source_id, target_id, self.config.default_max_depth)
    }

    pub fn find_paths(&self, source_id: &str, target_id: &str, max_depth: usize) -> PathSearch {
        if !self.entities.contains_key(source_id) {
            return PathSearch::default();
        }

        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<Frontier> = VecDeque::new();
        let mut paths: Vec<GraphPath> = Vec::new();

        queue.push_back(Frontier {
            entity_id: source_id.to_string(),
            entities: vec![source_id.to_string()],
            relationships: Vec::new(),
            depth: 0,
        });

        while let Some(current) = queue.pop_front() {
            if current.entity_id == target_id {
                paths.push(GraphPath {
                    entities: current.entities,
                    relationships: current.relationships,
                });
                continue;
            }

            if !visited.insert(current.entity_id.clone()) {
                continue;
            }

            if current.depth >= max_depth {
                continue;
            }

            for relationship in self.get_entity_relationships(&current.entity_id) {
                let next = relationship.other_endpoint(&current.entity_id);
                if visited.contains(next) {
                    continue;
                }

                let mut entities = current.entities.clone();
                entities.push(next.to_string());
                let mut relationships = current.relationships.clone();
                relationships.push(relationship.id.clone());

                queue.push_back(Frontier {
                    entity_id: next.to_string(),
                    entities,
                    relationships,
                    depth: current.depth + 1,
                });
            }
        }

        debug!(
            source_id,
            target_id,
            max_depth,
            paths = paths.len(),
            "path search complete"
        );

        self.collect_paths(paths)
    }

    /// Resolve the deduplicated entities and relationships on `paths`.
    fn collect_paths(&self, paths: Vec<GraphPath>) -> PathSearch {
        let mut seen_entities = HashSet::new();
        let mut seen_relationships = HashSet::new();
        let mut entities = Vec::new();
        let mut relationships = Vec::new();

        for path in &paths {
            for id in &path.entities {
                if seen_entities.insert(id.as_str()) {
                    if let Some(entity) = self.entities.get(id) {
                        entities.push(entity.clone());
                    }
                }
            }
            for id in &path.relationships {
                if seen_relationships.insert(id.as_str()) {
                    if let Some(relationship) = self.relationships.get(id) {
                        relationships.push(relationship.clone());
                    }
                }
            }
        }

        PathSearch {
            entities,
            relationships,
            paths,
        }
    }
}
