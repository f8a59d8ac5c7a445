//! Fuzzy name index cache.
//!
//! This module provides:
//! - `FuzzyIndex`: ranked approximate search over one entity listing
//! - `IndexCache`: lazily built indexes keyed by `(league, entity type)`
//!
//! An index is built at most once per key for the life of the cache. The
//! population path is serialized per key, so concurrent first lookups share
//! one fetch; a failed fetch leaves the key empty for a later retry.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{AsaError, Result};
use crate::types::{EntityRecord, EntityType, League};
use crate::utils::matching::{normalize, score_normalized, MAX_CANDIDATE_SCORE};

/// A candidate record with its dissimilarity to the query (lower is better)
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<'a> {
    pub record: &'a EntityRecord,
    pub score: f64,
}

/// Searchable index over the `{entity}_name` field of one listing
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
    entity_type: EntityType,
    /// (normalized name, record), in listing order
    entries: Vec<(String, EntityRecord)>,
}

impl FuzzyIndex {
    /// Build from raw API records. Records without a string name field are
    /// not searchable and are left out.
    pub fn build(entity_type: EntityType, records: Vec<Value>) -> Self {
        let name_field = entity_type.name_field();
        let total = records.len();

        let entries: Vec<(String, EntityRecord)> = records
            .into_iter()
            .filter_map(|record| match record {
                Value::Object(map) => {
                    let name = map.get(&name_field)?.as_str().map(normalize)?;
                    Some((name, map))
                }
                _ => None,
            })
            .collect();

        if entries.len() < total {
            debug!(
                "Skipped {} {} records without {}",
                total - entries.len(),
                entity_type,
                name_field
            );
        }

        Self {
            entity_type,
            entries,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranked candidates for a free-text query, best first. Ties keep listing
    /// order. Empty queries and queries with nothing close return no
    /// candidates.
    pub fn search(&self, query: &str) -> Vec<MatchCandidate<'_>> {
        let query_norm = normalize(query);
        if query_norm.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<MatchCandidate<'_>> = self
            .entries
            .iter()
            .map(|(name, record)| MatchCandidate {
                record,
                score: score_normalized(&query_norm, name),
            })
            .filter(|c| c.score < MAX_CANDIDATE_SCORE)
            .collect();

        candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
        candidates
    }
}

/// Composite cache key; indexes for the same entity type differ per league
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub league: League,
    pub entity_type: EntityType,
}

impl IndexKey {
    pub fn new(league: League, entity_type: EntityType) -> Self {
        Self {
            league,
            entity_type,
        }
    }
}

type Slot = Arc<OnceCell<Arc<FuzzyIndex>>>;

/// Grow-only map of lazily built indexes
#[derive(Debug, Default)]
pub struct IndexCache {
    slots: Mutex<FxHashMap<IndexKey, Slot>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: IndexKey) -> Slot {
        self.slots
            .lock()
            .entry(key)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Return the index for `key`, building it from `load` on first use.
    ///
    /// `load` runs at most once per successful build, even when several
    /// callers miss at the same time.
    pub async fn get_or_build<F, Fut>(&self, key: IndexKey, load: F) -> Result<Arc<FuzzyIndex>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Value>>>,
    {
        let slot = self.slot(key);

        if let Some(index) = slot.get() {
            debug!("Index cache hit for {}|{}", key.league, key.entity_type);
            return Ok(index.clone());
        }

        let index = slot
            .get_or_try_init(|| async move {
                let records = load().await?;
                let index = FuzzyIndex::build(key.entity_type, records);
                info!(
                    "Built {} index for {} with {} names",
                    key.entity_type,
                    key.league,
                    index.len()
                );
                Ok::<_, AsaError>(Arc::new(index))
            })
            .await?;

        Ok(index.clone())
    }

    /// Number of built indexes
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn managers() -> Vec<Value> {
        vec![
            json!({"manager_id": "m1", "manager_name": "Josh Wolff"}),
            json!({"manager_id": "m2", "manager_name": "Bruce Arena"}),
        ]
    }

    #[test]
    fn test_search_ranks_best_first() {
        let index = FuzzyIndex::build(EntityType::Manager, managers());
        let results = index.search("Josh Wolf");
        assert_eq!(results[0].record["manager_id"], "m1");
        assert!(results[0].score < 0.35);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let index = FuzzyIndex::build(EntityType::Manager, managers());
        assert!(index.search("Zzyzx Nonexistent").is_empty());
        assert!(index.search("").is_empty());
        assert!(index.search("   ").is_empty());
    }

    #[test]
    fn test_build_skips_nameless_records() {
        let mut records = managers();
        records.push(json!({"manager_id": "m3"}));
        records.push(json!("not an object"));
        let index = FuzzyIndex::build(EntityType::Manager, records);
        assert_eq!(index.len(), 2);
        assert_eq!(index.entity_type(), EntityType::Manager);
    }

    #[tokio::test]
    async fn test_cache_builds_once() {
        let cache = IndexCache::new();
        let key = IndexKey::new(League::MLS, EntityType::Manager);
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let index = cache
                .get_or_build(key, || async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(managers())
                })
                .await
                .unwrap();
            assert_eq!(index.len(), 2);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_keys_are_per_league() {
        let cache = IndexCache::new();
        let mls = IndexKey::new(League::MLS, EntityType::Manager);
        let nwsl = IndexKey::new(League::NWSL, EntityType::Manager);

        cache.get_or_build(mls, || async { Ok(managers()) }).await.unwrap();
        let nwsl_index = cache
            .get_or_build(nwsl, || async { Ok(Vec::new()) })
            .await
            .unwrap();
        // cached, so this loader is never run
        let mls_index = cache
            .get_or_build(mls, || async { Ok(Vec::new()) })
            .await
            .unwrap();

        assert!(nwsl_index.is_empty());
        assert_eq!(mls_index.len(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache = IndexCache::new();
        let key = IndexKey::new(League::USLC, EntityType::Team);

        let err = cache
            .get_or_build(key, || async {
                Err(AsaError::Retrieval {
                    league: League::USLC,
                    url: "u".to_string(),
                    status: 500,
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AsaError::Retrieval { status: 500, .. }));
        assert!(cache.is_empty());

        let index = cache
            .get_or_build(key, || async {
                Ok(vec![json!({"team_id": "t1", "team_name": "Louisville City"})])
            })
            .await
            .unwrap();
        assert_eq!(index.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_load() {
        let cache = IndexCache::new();
        let key = IndexKey::new(League::NWSL, EntityType::Referee);
        let loads = AtomicUsize::new(0);

        let build = || {
            cache.get_or_build(key, || async {
                loads.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(vec![json!({"referee_id": "r1", "referee_name": "Ismail Elfath"})])
            })
        };

        let (a, b, c) = tokio::join!(build(), build(), build());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
