use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LinkMemoryParams {
    #[schemars(description = "ID of the memory to link")]
    pub memory_id: String,

    #[schemars(description = "ID of the entity the memory is about. Omit to remove the link.")]
    pub entity_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LinkedMemoriesParams {
    #[schemars(description = "ID of the entity")]
    pub entity_id: String,
}
