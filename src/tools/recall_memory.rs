//! MCP recall tool parameter definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `recall_memory` MCP tool. All filters are combined with AND.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct RecallMemoryParams {
    /// Free-text query. Without it, results are ranked by recency, importance and usage.
    #[schemars(
        description = "Case-insensitive text to look for in content, tags and context. Omit to rank by recency, importance and usage."
    )]
    pub query: Option<String>,

    /// Exact context label.
    #[schemars(description = "Only memories with exactly this context")]
    pub context: Option<String>,

    /// Matches memories carrying any of these tags.
    #[schemars(description = "Only memories carrying at least one of these tags")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Minimum importance (0.0-1.0)")]
    pub min_importance: Option<f64>,

    /// RFC 3339 lower bound on creation time, inclusive.
    #[schemars(description = "Earliest creation time, RFC 3339, inclusive")]
    pub start: Option<String>,

    /// RFC 3339 upper bound on creation time, inclusive.
    #[schemars(description = "Latest creation time, RFC 3339, inclusive")]
    pub end: Option<String>,

    #[schemars(description = "Maximum number of results. Defaults to 10.")]
    pub limit: Option<usize>,
}

/// Parameters for the `search_memory` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchMemoryParams {
    #[schemars(description = "Case-insensitive text to search for")]
    pub query: String,

    #[schemars(description = "Maximum number of results. Defaults to 10.")]
    pub limit: Option<usize>,
}

/// Parameters for the `recent_memories` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecentMemoriesParams {
    #[schemars(description = "Maximum number of results. Defaults to 10.")]
    pub limit: Option<usize>,
}

/// Parameters for the `important_memories` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImportantMemoriesParams {
    #[schemars(description = "Minimum importance (0.0-1.0). Defaults to 0.7.")]
    pub threshold: Option<f64>,

    #[schemars(description = "Maximum number of results. Defaults to 10.")]
    pub limit: Option<usize>,
}
