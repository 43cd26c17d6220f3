use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteMemoryParams {
    #[schemars(description = "ID of the memory to delete")]
    pub id: String,
}

/// Parameters shared by the `clear_memories` and `clear_graph` tools.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClearParams {
    #[schemars(description = "Must be true; everything is removed and cannot be recovered")]
    pub confirm: bool,
}
