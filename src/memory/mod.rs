pub mod consolidate;
pub mod scoring;
pub mod search;
pub mod stats;
pub mod store;
pub mod types;

pub use store::MemoryStore;
