//! MCP entity tool parameter definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `add_entity` MCP tool. Re-adding an existing ID replaces it.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddEntityParams {
    #[schemars(description = "Entity type (e.g. 'Service', 'Person', 'Database')")]
    pub r#type: String,

    #[schemars(description = "JSON object of properties; 'name' or 'title' is used as the display label")]
    pub properties: Option<serde_json::Value>,

    #[schemars(description = "Entity ID. Generated when omitted; an existing ID is replaced.")]
    pub id: Option<String>,

    #[schemars(description = "Optional tags")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEntityParams {
    #[schemars(description = "ID of the entity")]
    pub id: String,

    #[schemars(description = "If true, include neighbouring entities and their relationships")]
    pub include_related: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EntitiesByTypeParams {
    #[schemars(description = "Entity type to list")]
    pub r#type: String,
}

/// Parameters for the `search_entities` MCP tool.
///
/// An entity matches when its type, a property value, or one of its tags contains the
/// query. Entities that miss all three match only if they carry every tag in `tags`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchEntitiesParams {
    #[schemars(description = "Case-insensitive text matched against type, property values and tags")]
    pub query: String,

    #[schemars(description = "Only search entities of this type")]
    pub r#type: Option<String>,

    #[schemars(
        description = "Entities not matching the query still match if they carry all of these tags"
    )]
    pub tags: Option<Vec<String>>,
}
