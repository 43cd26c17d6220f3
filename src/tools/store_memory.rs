use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreMemoryParams {
    #[schemars(description = "The natural language content of the memory")]
    pub content: String,

    #[schemars(description = "Optional context label (e.g. project, session, or topic)")]
    pub context: Option<String>,

    #[schemars(description = "Optional tags; entries sharing context and tags are linked automatically")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Importance 0.0-1.0. Defaults to 0.5.")]
    pub importance: Option<f64>,

    #[schemars(description = "Optional JSON object of metadata")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateMemoryParams {
    #[schemars(description = "ID of the memory to update")]
    pub id: String,

    #[schemars(description = "Replacement content")]
    pub content: Option<String>,

    #[schemars(description = "Replacement context label")]
    pub context: Option<String>,

    #[schemars(description = "If true, remove the context label (ignored when 'context' is set)")]
    pub clear_context: Option<bool>,

    #[schemars(description = "Replacement tag list")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Replacement importance 0.0-1.0")]
    pub importance: Option<f64>,

    #[schemars(description = "Replacement JSON metadata object")]
    pub metadata: Option<serde_json::Value>,
}
