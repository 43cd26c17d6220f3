//! Associative memory for AI agents: a scored, multi-indexed memory store paired with a
//! typed knowledge graph, served over MCP.
//!
//! Everything lives in process memory. Nothing is persisted; a JSON snapshot can be
//! imported at startup.
//!
//! # Architecture
//!
//! - **Memory store**: entries indexed by context, tag, and insertion order. Storing an
//!   entry links it to every similar entry (shared context and tag overlap).
//! - **Recall**: conjunctive filters, then ranking by query relevance or by a composite
//!   of recency, importance, and access frequency. Recall records an access on every
//!   entry it returns.
//! - **Knowledge graph**: typed entities and relationships with adjacency and type
//!   indices; breadth-first path enumeration between entities.
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`memory`]: Memory store: write path, recall, consolidation, statistics
//! - [`graph`]: Knowledge graph: entities, relationships, search, path finding
//! - [`link`]: Links between memory entries and graph entities
//! - [`workspace`]: The store and graph served together, with snapshot seeding

pub mod config;
pub mod graph;
pub mod link;
pub mod memory;
pub mod workspace;
