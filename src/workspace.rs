//! The memory store and knowledge graph served together.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::MnemosConfig;
use crate::graph::KnowledgeGraph;
use crate::memory::types::MemoryEntry;
use crate::memory::MemoryStore;

#[derive(Debug, Default)]
pub struct Workspace {
    pub memory: MemoryStore,
    pub graph: KnowledgeGraph,
}

impl Workspace {
    pub fn new(config: &MnemosConfig) -> Self {
        Self {
            memory: MemoryStore::with_config(config.memory.clone()),
            graph: KnowledgeGraph::with_config(config.graph.clone()),
        }
    }

    /// Import a JSON array of memory entries (the `export_memories` format).
    /// Returns the number of entries written.
    pub fn seed_from(&mut self, path: &Path) -> Result<usize> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
        let entries: Vec<MemoryEntry> =
            serde_json::from_str(&json).context("failed to parse snapshot JSON")?;

        let written = self.memory.import(entries);
        tracing::info!(path = %path.display(), written, "snapshot imported");
        Ok(written)
    }
}
