//! MCP relationship and traversal tool parameter definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `add_relationship` MCP tool. Both endpoints must already exist.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddRelationshipParams {
    #[schemars(description = "ID of the source entity")]
    pub source_id: String,

    #[schemars(description = "ID of the target entity")]
    pub target_id: String,

    #[schemars(description = "Relationship type (e.g. 'depends_on', 'owns', 'part_of')")]
    pub r#type: String,

    #[schemars(description = "Optional JSON object of properties")]
    pub properties: Option<serde_json::Value>,

    #[schemars(description = "Optional numeric weight")]
    pub weight: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RelatedEntitiesParams {
    #[schemars(description = "ID of the entity whose neighbours to list")]
    pub id: String,

    #[schemars(description = "Only follow relationships of this type")]
    pub relationship_type: Option<String>,
}

/// Parameters for the `find_paths` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindPathsParams {
    #[schemars(description = "ID of the entity to start from")]
    pub source_id: String,

    #[schemars(description = "ID of the entity to reach")]
    pub target_id: String,

    #[schemars(description = "Maximum number of hops. Defaults to 5.")]
    pub max_depth: Option<usize>,
}
