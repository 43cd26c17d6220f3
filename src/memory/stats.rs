use crate::memory::store::MemoryStore;
use crate::memory::types::MemoryStats;

impl MemoryStore {
    /// Compute memory store statistics.
    pub fn get_stats(&self) -> MemoryStats {
        let total = self.entries.len();
        let oldest = self.entries.values().map(|e| e.timestamp).min();
        let newest = self.entries.values().map(|e| e.timestamp).max();
        let average_importance = if total == 0 {
            0.0
        } else {
            self.entries.values().map(|e| e.importance).sum::<f64>() / total as f64
        };

        MemoryStats {
            total_memories: total,
            contexts: self.index.context_count(),
            tags: self.index.tag_count(),
            oldest_memory: oldest,
            newest_memory: newest,
            average_importance,
        }
    }
}
