pub mod entity;
pub mod error;
pub mod forget_memory;
pub mod link_memory;
pub mod recall_memory;
pub mod relationship;
pub mod store_memory;
pub mod transfer;

use entity::{AddEntityParams, EntitiesByTypeParams, GetEntityParams, SearchEntitiesParams};
use error::{object, positive_limit, require_text, timestamp, unit_interval, ToolError};
use forget_memory::{ClearParams, DeleteMemoryParams};
use link_memory::{LinkMemoryParams, LinkedMemoriesParams};
use recall_memory::{
    ImportantMemoriesParams, RecallMemoryParams, RecentMemoriesParams, SearchMemoryParams,
};
use relationship::{AddRelationshipParams, FindPathsParams, RelatedEntitiesParams};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use store_memory::{StoreMemoryParams, UpdateMemoryParams};
use transfer::{ConsolidateParams, ImportMemoriesParams};

use mnemos::link;
use mnemos::memory::types::{MemoryEntry, MemoryPatch, NewMemory, RecallQuery, TimeRange};
use mnemos::workspace::Workspace;

const DEFAULT_IMPORTANT_THRESHOLD: f64 = 0.7;

fn to_json<T: Serialize>(value: &T) -> Result<String, ToolError> {
    Ok(serde_json::to_string(value)?)
}

fn confirmed(params: &ClearParams) -> Result<(), ToolError> {
    if !params.confirm {
        return Err(ToolError::InvalidArgument(
            "confirm must be true to clear".into(),
        ));
    }
    Ok(())
}

/// The mnemos MCP tool handler. Holds the shared workspace and exposes all MCP tools
/// via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct MnemosTools {
    tool_router: ToolRouter<Self>,
    workspace: Arc<Mutex<Workspace>>,
}

impl MnemosTools {
    /// Lock the workspace. Each tool call holds the lock for its whole mutation so index
    /// updates are never observed half-done.
    fn lock(&self) -> Result<MutexGuard<'_, Workspace>, ToolError> {
        self.workspace
            .lock()
            .map_err(|e| ToolError::LockPoisoned(e.to_string()))
    }
}

#[tool_router]
impl MnemosTools {
    pub fn new(workspace: Arc<Mutex<Workspace>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            workspace,
        }
    }

    // ── Memory ───────────────────────────────────────────────────────────────

    /// Store a new memory.
    #[tool(description = "Store a new memory. Memories sharing a context and tags are linked to each other automatically.")]
    async fn store_memory(
        &self,
        Parameters(params): Parameters<StoreMemoryParams>,
    ) -> Result<String, String> {
        require_text("content", &params.content)?;
        let importance = unit_interval("importance", params.importance)?;
        let metadata = object("metadata", params.metadata)?;

        tracing::info!(
            content_len = params.content.len(),
            context = params.context.as_deref().unwrap_or(""),
            tags = params.tags.as_ref().map_or(0, Vec::len),
            "store_memory called"
        );

        let new = NewMemory {
            content: params.content,
            context: params.context,
            tags: params.tags.unwrap_or_default(),
            importance,
            metadata,
        };
        let entry = self.lock()?.memory.store(new);

        tracing::info!(
            id = %entry.id,
            related = entry.related_memories.len(),
            "memory stored"
        );

        Ok(to_json(&entry)?)
    }

    /// Filtered, ranked recall.
    #[tool(description = "Recall memories. Filters (context, tags, min_importance, start/end) are combined with AND; results are ranked by query relevance or, without a query, by recency, importance and usage. Recalled memories have their access count incremented.")]
    async fn recall_memory(
        &self,
        Parameters(params): Parameters<RecallMemoryParams>,
    ) -> Result<String, String> {
        let start = timestamp("start", params.start.as_deref())?;
        let end = timestamp("end", params.end.as_deref())?;
        let query = RecallQuery {
            query: params.query,
            context: params.context,
            tags: params.tags.unwrap_or_default(),
            min_importance: unit_interval("min_importance", params.min_importance)?,
            time_range: (start.is_some() || end.is_some()).then_some(TimeRange { start, end }),
            limit: positive_limit(params.limit)?,
        };

        tracing::info!(query = query.query.as_deref().unwrap_or(""), "recall_memory called");
        let results = self.lock()?.memory.recall(&query);
        tracing::info!(returned = results.len(), "recall complete");

        Ok(to_json(&results)?)
    }

    #[tool(description = "Search memories by text in content, tags and context.")]
    async fn search_memory(
        &self,
        Parameters(params): Parameters<SearchMemoryParams>,
    ) -> Result<String, String> {
        require_text("query", &params.query)?;
        let limit = positive_limit(params.limit)?;

        tracing::info!(query = %params.query, "search_memory called");
        let results = self.lock()?.memory.search(&params.query, limit);
        Ok(to_json(&results)?)
    }

    #[tool(description = "List the most recently stored memories, newest first.")]
    async fn recent_memories(
        &self,
        Parameters(params): Parameters<RecentMemoriesParams>,
    ) -> Result<String, String> {
        let limit = positive_limit(params.limit)?;
        let results = self.lock()?.memory.get_recent(limit);
        Ok(to_json(&results)?)
    }

    #[tool(description = "List memories at or above an importance threshold.")]
    async fn important_memories(
        &self,
        Parameters(params): Parameters<ImportantMemoriesParams>,
    ) -> Result<String, String> {
        let threshold = unit_interval("threshold", params.threshold)?
            .unwrap_or(DEFAULT_IMPORTANT_THRESHOLD);
        let limit = positive_limit(params.limit)?;
        let results = self.lock()?.memory.get_important(threshold, limit);
        Ok(to_json(&results)?)
    }

    #[tool(description = "Update fields of an existing memory. Related-memory links are not recomputed.")]
    async fn update_memory(
        &self,
        Parameters(params): Parameters<UpdateMemoryParams>,
    ) -> Result<String, String> {
        if let Some(content) = &params.content {
            require_text("content", content)?;
        }
        let context = match (params.context, params.clear_context) {
            (Some(context), _) => Some(Some(context)),
            (None, Some(true)) => Some(None),
            (None, _) => None,
        };
        let patch = MemoryPatch {
            content: params.content,
            context,
            tags: params.tags,
            importance: unit_interval("importance", params.importance)?,
            metadata: object("metadata", params.metadata)?,
            ..Default::default()
        };

        tracing::info!(id = %params.id, "update_memory called");
        let updated = self
            .lock()?
            .memory
            .update(&params.id, patch)
            .ok_or_else(|| ToolError::not_found("memory", &params.id))?;

        Ok(to_json(&updated)?)
    }

    #[tool(description = "Delete a memory by ID. Links from other memories are removed.")]
    async fn delete_memory(
        &self,
        Parameters(params): Parameters<DeleteMemoryParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "delete_memory called");
        if !self.lock()?.memory.delete(&params.id) {
            return Err(ToolError::not_found("memory", &params.id).into());
        }
        Ok(serde_json::json!({ "id": params.id, "deleted": true }).to_string())
    }

    #[tool(description = "Find tags shared by several memories and summarise the most important ones.")]
    async fn consolidate_memories(
        &self,
        Parameters(params): Parameters<ConsolidateParams>,
    ) -> Result<String, String> {
        let result = self.lock()?.memory.consolidate(params.context.as_deref());
        tracing::info!(patterns = result.patterns.len(), "consolidation complete");
        Ok(to_json(&result)?)
    }

    #[tool(description = "Get memory store statistics: counts, contexts, tags, time span, mean importance.")]
    async fn memory_stats(&self) -> Result<String, String> {
        let stats = self.lock()?.memory.get_stats();
        Ok(to_json(&stats)?)
    }

    #[tool(description = "Export every memory as a JSON array, oldest first.")]
    async fn export_memories(&self) -> Result<String, String> {
        let entries = self.lock()?.memory.export();
        tracing::info!(count = entries.len(), "memories exported");
        Ok(to_json(&entries)?)
    }

    #[tool(description = "Import memories in the export_memories format, replacing entries with the same ID.")]
    async fn import_memories(
        &self,
        Parameters(params): Parameters<ImportMemoriesParams>,
    ) -> Result<String, String> {
        let entries = params
            .memories
            .into_iter()
            .map(serde_json::from_value::<MemoryEntry>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ToolError::InvalidArgument(format!("invalid memory entry: {e}")))?;

        let written = self.lock()?.memory.import(entries);
        tracing::info!(written, "memories imported");
        Ok(serde_json::json!({ "imported": written }).to_string())
    }

    #[tool(description = "Remove every memory. Requires confirm=true.")]
    async fn clear_memories(
        &self,
        Parameters(params): Parameters<ClearParams>,
    ) -> Result<String, String> {
        confirmed(&params)?;
        let mut ws = self.lock()?;
        let removed = ws.memory.len();
        ws.memory.clear();
        tracing::info!(removed, "memories cleared");
        Ok(serde_json::json!({ "removed": removed }).to_string())
    }

    // ── Knowledge graph ──────────────────────────────────────────────────────

    #[tool(description = "Add or replace an entity in the knowledge graph.")]
    async fn add_entity(
        &self,
        Parameters(params): Parameters<AddEntityParams>,
    ) -> Result<String, String> {
        require_text("type", &params.r#type)?;
        let properties = object("properties", params.properties)?.unwrap_or_default();

        tracing::info!(entity_type = %params.r#type, id = ?params.id, "add_entity called");
        let entity = self
            .lock()?
            .graph
            .add_entity(&params.r#type, properties, params.id, params.tags);
        Ok(to_json(&entity)?)
    }

    #[tool(description = "Get an entity by ID, optionally with its neighbours.")]
    async fn get_entity(
        &self,
        Parameters(params): Parameters<GetEntityParams>,
    ) -> Result<String, String> {
        let ws = self.lock()?;
        let entity = ws
            .graph
            .get_entity(&params.id)
            .ok_or_else(|| ToolError::not_found("entity", &params.id))?;

        if params.include_related.unwrap_or(false) {
            let related = ws.graph.get_related_entities(&params.id, None);
            return Ok(to_json(&serde_json::json!({
                "entity": entity,
                "related": related,
            }))?);
        }
        Ok(to_json(entity)?)
    }

    #[tool(description = "List all entities of a type.")]
    async fn entities_by_type(
        &self,
        Parameters(params): Parameters<EntitiesByTypeParams>,
    ) -> Result<String, String> {
        let ws = self.lock()?;
        Ok(to_json(&ws.graph.get_entities_by_type(&params.r#type))?)
    }

    #[tool(description = "Create a relationship between two existing entities.")]
    async fn add_relationship(
        &self,
        Parameters(params): Parameters<AddRelationshipParams>,
    ) -> Result<String, String> {
        require_text("type", &params.r#type)?;
        let properties = object("properties", params.properties)?;

        tracing::info!(
            source = %params.source_id,
            target = %params.target_id,
            relationship_type = %params.r#type,
            "add_relationship called"
        );

        let mut ws = self.lock()?;
        let created = ws.graph.add_relationship(
            &params.source_id,
            &params.target_id,
            &params.r#type,
            properties,
            params.weight,
        );
        let Some(relationship) = created else {
            let missing = if ws.graph.get_entity(&params.source_id).is_none() {
                &params.source_id
            } else {
                &params.target_id
            };
            return Err(ToolError::not_found("entity", missing).into());
        };

        Ok(to_json(&relationship)?)
    }

    #[tool(description = "List entities connected to an entity, in either direction, with the connecting relationship.")]
    async fn related_entities(
        &self,
        Parameters(params): Parameters<RelatedEntitiesParams>,
    ) -> Result<String, String> {
        let ws = self.lock()?;
        if ws.graph.get_entity(&params.id).is_none() {
            return Err(ToolError::not_found("entity", &params.id).into());
        }
        let related = ws
            .graph
            .get_related_entities(&params.id, params.relationship_type.as_deref());
        Ok(to_json(&related)?)
    }

    #[tool(description = "Search entities by type name, property values and tags.")]
    async fn search_entities(
        &self,
        Parameters(params): Parameters<SearchEntitiesParams>,
    ) -> Result<String, String> {
        let ws = self.lock()?;
        let found = ws.graph.search_entities(
            &params.query,
            params.r#type.as_deref(),
            params.tags.as_deref(),
        );
        Ok(to_json(&found)?)
    }

    #[tool(description = "Find paths between two entities by breadth-first search, following relationships in both directions.")]
    async fn find_paths(
        &self,
        Parameters(params): Parameters<FindPathsParams>,
    ) -> Result<String, String> {
        let ws = self.lock()?;
        let max_depth = params
            .max_depth
            .unwrap_or(ws.graph.config().default_max_depth);

        tracing::info!(
            source = %params.source_id,
            target = %params.target_id,
            max_depth,
            "find_paths called"
        );
        let result = ws
            .graph
            .find_paths(&params.source_id, &params.target_id, max_depth);
        Ok(to_json(&result)?)
    }

    #[tool(description = "Get knowledge graph statistics: entity and relationship counts, entities per type.")]
    async fn graph_stats(&self) -> Result<String, String> {
        let stats = self.lock()?.graph.get_stats();
        Ok(to_json(&stats)?)
    }

    #[tool(description = "Export the graph as labelled nodes and edges for visualisation.")]
    async fn export_graph(&self) -> Result<String, String> {
        let export = self.lock()?.graph.export_graph();
        Ok(to_json(&export)?)
    }

    #[tool(description = "Remove every entity and relationship. Requires confirm=true.")]
    async fn clear_graph(
        &self,
        Parameters(params): Parameters<ClearParams>,
    ) -> Result<String, String> {
        confirmed(&params)?;
        let mut ws = self.lock()?;
        let stats = ws.graph.get_stats();
        ws.graph.clear();
        tracing::info!(
            entities = stats.entity_count,
            relationships = stats.relationship_count,
            "graph cleared"
        );
        Ok(serde_json::json!({
            "removed_entities": stats.entity_count,
            "removed_relationships": stats.relationship_count,
        })
        .to_string())
    }

    // ── Links ────────────────────────────────────────────────────────────────

    #[tool(description = "Link a memory to the entity it is about, or remove the link by omitting entity_id.")]
    async fn link_memory(
        &self,
        Parameters(params): Parameters<LinkMemoryParams>,
    ) -> Result<String, String> {
        let mut ws = self.lock()?;
        if let Some(entity_id) = params.entity_id.as_deref() {
            if ws.graph.get_entity(entity_id).is_none() {
                return Err(ToolError::not_found("entity", entity_id).into());
            }
        }
        let entry = link::link_memory(
            &mut ws.memory,
            &params.memory_id,
            params.entity_id.as_deref(),
        )
        .ok_or_else(|| ToolError::not_found("memory", &params.memory_id))?;

        tracing::info!(id = %entry.id, entity = ?entry.entity_id, "memory linked");
        Ok(to_json(&entry)?)
    }

    #[tool(description = "List memories linked to an entity.")]
    async fn linked_memories(
        &self,
        Parameters(params): Parameters<LinkedMemoriesParams>,
    ) -> Result<String, String> {
        let ws = self.lock()?;
        Ok(to_json(&link::memories_for_entity(&ws.memory, &params.entity_id))?)
    }
}

#[tool_handler]
impl ServerHandler for MnemosTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "mnemos is an in-memory associative memory and knowledge graph. Use store_memory \
                 and recall_memory for memories, add_entity/add_relationship/find_paths for the \
                 graph, and link_memory to connect the two. Nothing is persisted."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
