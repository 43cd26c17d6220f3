pub mod paths;
pub mod search;
pub mod store;
pub mod types;

pub use store::KnowledgeGraph;
