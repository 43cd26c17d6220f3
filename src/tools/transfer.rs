//! MCP consolidation and bulk import parameter definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConsolidateParams {
    #[schemars(description = "Only consolidate memories with this context")]
    pub context: Option<String>,
}

/// Parameters for the `import_memories` MCP tool.
///
/// Entries use the `export_memories` format and are upserted by ID.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImportMemoriesParams {
    #[schemars(description = "Memory entries as produced by export_memories; upserted by id")]
    pub memories: Vec<serde_json::Value>,
}
