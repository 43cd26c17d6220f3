//! Read path: filtering, ranking and access tracking.
//!
//! [`MemoryStore::recall`] applies conjunctive filters (context via the index, ANY-tag
//! overlap, importance floor, inclusive time window), ranks survivors by query
//! relevance or composite score, truncates, then records an access on every entry it
//! returns. Recall is therefore not read-only.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::memory::scoring::{composite_score, relevance};
use crate::memory::store::MemoryStore;
use crate::memory::types::{MemoryEntry, RecallQuery};

impl MemoryStore {
    /// Filter, rank, truncate, and track access.
    pub fn recall(&mut self, query: &RecallQuery) -> Vec<MemoryEntry> {
        let now = Utc::now();
        let limit = query.limit.unwrap_or(self.config.default_limit);
        let candidates = self.candidates(query);

        let needle = query
            .query
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        let mut ranked: Vec<(&str, f64)> = match needle {
            Some(ref needle) => candidates
                .into_iter()
                .map(|e| (e.id.as_str(), relevance(e, needle)))
                .filter(|(_, score)| *score > 0.0)
                .collect(),
            None => {
                let half_life = self.config.recency_half_life_days;
                candidates
                    .into_iter()
                    .map(|e| (e.id.as_str(), composite_score(e, now, half_life)))
                    .collect()
            }
        };
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(limit);

        let ids: Vec<String> = ranked.into_iter().map(|(id, _)| id.to_string()).collect();
        debug!(
            query = needle.as_deref().unwrap_or(""),
            returned = ids.len(),
            "recall"
        );
        self.record_access(&ids, now)
    }

    /// Entries passing every filter in `query`, in insertion order.
    fn candidates(&self, query: &RecallQuery) -> Vec<&MemoryEntry> {
        let by_context: Option<&HashSet<String>> = match query.context.as_deref() {
            Some(context) if !context.is_empty() => match self.index.context_ids(context) {
                Some(ids) => Some(ids),
                None => return Vec::new(),
            },
            _ => None,
        };

        let by_tag: Option<HashSet<&str>> = if query.tags.is_empty() {
            None
        } else {
            Some(
                query
                    .tags
                    .iter()
                    .filter_map(|t| self.index.tag_ids(t))
                    .flatten()
                    .map(String::as_str)
                    .collect(),
            )
        };

        self.iter()
            .filter(|e| by_context.is_none_or(|ids| ids.contains(&e.id)))
            .filter(|e| by_tag.as_ref().is_none_or(|ids| ids.contains(e.id.as_str())))
            .filter(|e| query.min_importance.is_none_or(|min| e.importance >= min))
            .filter(|e| query.time_range.is_none_or(|r| r.contains(e.timestamp)))
            .collect()
    }

    /// Bump `access_count` and stamp `last_accessed` on each ID, returning the
    /// updated entries in the given order.
    fn record_access(&mut self, ids: &[String], now: DateTime<Utc>) -> Vec<MemoryEntry> {
        ids.iter()
            .filter_map(|id| {
                let entry = self.entries.get_mut(id)?;
                entry.access_count = entry.access_count.saturating_add(1);
                entry.last_accessed = Some(now);
                Some(entry.clone())
            })
            .collect()
    }

    /// Query-only recall.
    pub fn search(&mut self, query: &str, limit: Option<usize>) -> Vec<MemoryEntry> {
        self.recall(&RecallQuery {
            query: Some(query.to_string()),
            limit,
            ..Default::default()
        })
    }

    pub fn get_by_context(&mut self, context: &str, limit: Option<usize>) -> Vec<MemoryEntry> {
        self.recall(&RecallQuery {
            context: Some(context.to_string()),
            limit,
            ..Default::default()
        })
    }

    /// Entries carrying any of `tags`.
    pub fn get_by_tags(&mut self, tags: &[String], limit: Option<usize>) -> Vec<MemoryEntry> {
        self.recall(&RecallQuery {
            tags: tags.to_vec(),
            limit,
            ..Default::default()
        })
    }

    /// Newest entries first, by timestamp alone. Records access like `recall`.
    pub fn get_recent(&mut self, limit: Option<usize>) -> Vec<MemoryEntry> {
        let now = Utc::now();
        let limit = limit.unwrap_or(self.config.default_limit);

        // Reverse insertion order so equal timestamps keep newest-inserted first.
        let mut entries: Vec<&MemoryEntry> = self
            .timeline
            .iter()
            .rev()
            .filter_map(|id| self.entries.get(id))
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let ids: Vec<String> = entries
            .into_iter()
            .take(limit)
            .map(|e| e.id.clone())
            .collect();
        self.record_access(&ids, now)
    }

    /// Entries with importance at or above `threshold`, ranked by composite score.
    pub fn get_important(&mut self, threshold: f64, limit: Option<usize>) -> Vec<MemoryEntry> {
        self.recall(&RecallQuery {
            min_importance: Some(threshold),
            limit,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::types::{NewMemory, TimeRange};
    use chrono::Duration;

    #[test]
    fn test_recall_records_access() {
        let mut store = MemoryStore::new();
        let a = store.store(NewMemory::new("alpha"));

        let results = store.recall(&RecallQuery::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].access_count, 1);
        assert!(results[0].last_accessed.is_some());
        assert_eq!(store.get(&a.id).unwrap().access_count, 1);
    }

    #[test]
    fn test_recall_only_touches_returned_entries() {
        let mut store = MemoryStore::new();
        let low = store.store(NewMemory::new("low").importance(0.1));
        let high = store.store(NewMemory::new("high").importance(0.9));

        let results = store.recall(&RecallQuery {
            limit: Some(1),
            ..Default::default()
        });

        assert_eq!(results[0].id, high.id);
        assert_eq!(store.get(&low.id).unwrap().access_count, 0);
        assert!(store.get(&low.id).unwrap().last_accessed.is_none());
    }

    #[test]
    fn test_recall_unknown_context_is_empty() {
        let mut store = MemoryStore::new();
        store.store(NewMemory::new("a").context("ops"));
        assert!(store.get_by_context("dev", None).is_empty());
    }

    #[test]
    fn test_recall_tags_match_any() {
        let mut store = MemoryStore::new();
        let a = store.store(NewMemory::new("a").tags(["rust"]));
        let b = store.store(NewMemory::new("b").tags(["go"]));
        store.store(NewMemory::new("c").tags(["python"]));

        let results = store.get_by_tags(&["rust".into(), "go".into()], None);
        let ids: HashSet<String> = results.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, HashSet::from([a.id, b.id]));
    }

    #[test]
    fn test_recall_filters_are_conjunctive() {
        let mut store = MemoryStore::new();
        let hit = store.store(NewMemory::new("a").context("ops").tags(["k8s"]).importance(0.9));
        store.store(NewMemory::new("b").context("ops").tags(["k8s"]).importance(0.2));
        store.store(NewMemory::new("c").context("dev").tags(["k8s"]).importance(0.9));

        let results = store.recall(&RecallQuery {
            context: Some("ops".into()),
            tags: vec!["k8s".into()],
            min_importance: Some(0.5),
            ..Default::default()
        });
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, hit.id);
    }

    #[test]
    fn test_recall_time_range() {
        let mut store = MemoryStore::new();
        let entry = store.store(NewMemory::new("a"));

        let before = RecallQuery {
            time_range: Some(TimeRange {
                start: None,
                end: Some(entry.timestamp - Duration::seconds(1)),
            }),
            ..Default::default()
        };
        assert!(store.recall(&before).is_empty());

        let inclusive = RecallQuery {
            time_range: Some(TimeRange {
                start: Some(entry.timestamp),
                end: Some(entry.timestamp),
            }),
            ..Default::default()
        };
        assert_eq!(store.recall(&inclusive).len(), 1);
    }

    #[test]
    fn test_search_excludes_misses() {
        let mut store = MemoryStore::new();
        let hit = store.store(NewMemory::new("Configure the Postgres replica"));
        store.store(NewMemory::new("Rotate the TLS certs"));

        let results = store.search("POSTGRES", None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, hit.id);
    }

    #[test]
    fn test_search_ranks_by_relevance() {
        let mut store = MemoryStore::new();
        let content_only = store.store(NewMemory::new("deploy notes"));
        let content_and_tag = store.store(NewMemory::new("deploy pipeline").tags(["deploy"]));

        let results = store.search("deploy", None);
        assert_eq!(results[0].id, content_and_tag.id);
        assert_eq!(results[1].id, content_only.id);
    }

    #[test]
    fn test_empty_query_ranks_by_composite() {
        let mut store = MemoryStore::new();
        store.store(NewMemory::new("a").importance(0.1));
        let b = store.store(NewMemory::new("b").importance(0.9));

        let results = store.recall(&RecallQuery {
            query: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, b.id);
    }

    #[test]
    fn test_get_recent_newest_first() {
        let mut store = MemoryStore::new();
        let ids: Vec<String> = (0..5)
            .map(|i| store.store(NewMemory::new(format!("m{i}"))).id)
            .collect();

        let recent = store.get_recent(Some(3));
        let got: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(got, vec![ids[4].as_str(), ids[3].as_str(), ids[2].as_str()]);
        assert!(recent.iter().all(|e| e.access_count == 1));
    }

    #[test]
    fn test_default_limit_applies() {
        let mut store = MemoryStore::new();
        for i in 0..15 {
            store.store(NewMemory::new(format!("m{i}")));
        }
        assert_eq!(store.recall(&RecallQuery::default()).len(), 10);
    }
}
