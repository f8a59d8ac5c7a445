//! Name to id resolution.
//!
//! Names are matched against the league's fuzzy index for the entity type.
//! The best candidate wins if its dissimilarity is within the acceptance
//! threshold; otherwise resolution fails with `NoMatch`. Batches are
//! all-or-nothing: one unresolved name fails the call.

use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AsaError, Result};
use crate::fanout::{fan_out, FanOut};
use crate::index_cache::{FuzzyIndex, IndexCache, IndexKey};
use crate::types::{EntityRecord, EntityType, League, LeagueIds};

#[derive(Debug)]
pub struct NameResolver {
    fanout: Arc<FanOut>,
    cache: IndexCache,
    threshold: f64,
}

impl NameResolver {
    pub fn new(fanout: Arc<FanOut>, threshold: f64) -> Self {
        Self {
            fanout,
            cache: IndexCache::new(),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Index for `(league, entity_type)`, fetching the full listing on first use
    pub async fn index(&self, league: League, entity_type: EntityType) -> Result<Arc<FuzzyIndex>> {
        let key = IndexKey::new(league, entity_type);
        self.cache
            .get_or_build(key, || {
                self.fanout.fetch_league_entities(league, entity_type, &[])
            })
            .await
    }

    /// Best record for `name`, or `NoMatch` when nothing is close enough
    pub async fn resolve_one(
        &self,
        name: &str,
        entity_type: EntityType,
        league: League,
    ) -> Result<EntityRecord> {
        let index = self.index(league, entity_type).await?;

        let no_match = || AsaError::NoMatch {
            name: name.to_string(),
            entity_type,
            league,
        };

        let candidates = index.search(name);
        let best = candidates.first().ok_or_else(|| no_match())?;

        if best.score > self.threshold {
            debug!(
                "Best {} match for {:?} in {} scored {:.3} (threshold {:.3})",
                entity_type, name, league, best.score, self.threshold
            );
            return Err(no_match());
        }

        debug!(
            "Resolved {:?} to {:?} in {} ({:.3})",
            name,
            best.record.get(&entity_type.name_field()),
            league,
            best.score
        );
        Ok(best.record.clone())
    }

    /// Resolve every name in every league. Output has one entry per league,
    /// in the order given, with ids in name order. An empty name list makes
    /// no requests and yields empty id lists.
    pub async fn resolve_many(
        &self,
        names: &[String],
        entity_type: EntityType,
        leagues: &[League],
    ) -> Result<Vec<LeagueIds>> {
        if names.is_empty() {
            return Ok(leagues
                .iter()
                .map(|&league| LeagueIds::empty(league, entity_type))
                .collect());
        }

        info!(
            "Resolving {} {} names across {} leagues",
            names.len(),
            entity_type,
            leagues.len()
        );

        fan_out(leagues, |league| async move {
            let records = try_join_all(
                names
                    .iter()
                    .map(|name| self.resolve_one(name, entity_type, league)),
            )
            .await?;

            let ids = records
                .iter()
                .map(|record| extract_id(record, entity_type, league))
                .collect::<Result<Vec<_>>>()?;

            Ok(LeagueIds {
                league,
                entity_type,
                ids,
            })
        })
        .await
    }
}

/// `{entity}_id` of a record as a string
pub fn extract_id(record: &EntityRecord, entity_type: EntityType, league: League) -> Result<String> {
    let field = entity_type.id_field();
    match record.get(&field) {
        Some(serde_json::Value::String(id)) => Ok(id.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(AsaError::Decode {
            url: format!("{}/{}", league, entity_type.plural()),
            reason: format!("record has no {} field", field),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http::{HttpFetch, HttpResponse};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns the same listing for every URL and counts requests
    struct ListingFetcher {
        listing: Value,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl HttpFetch for ListingFetcher {
        async fn get_json(&self, _url: &str) -> Result<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse::ok(self.listing.clone()))
        }
    }

    fn resolver_with(listing: Value, threshold: f64) -> (NameResolver, Arc<ListingFetcher>) {
        let fetcher = Arc::new(ListingFetcher {
            listing,
            calls: AtomicUsize::new(0),
        });
        let fanout = Arc::new(FanOut::new(fetcher.clone(), "https://asa.test/api/v1/", 1000));
        (NameResolver::new(fanout, threshold), fetcher)
    }

    fn managers() -> Value {
        json!([
            {"manager_id": "wolff", "manager_name": "Josh Wolff"},
            {"manager_id": "arena", "manager_name": "Bruce Arena"}
        ])
    }

    #[tokio::test]
    async fn test_resolve_one_typo() {
        let (resolver, _) = resolver_with(managers(), 0.35);
        let record = resolver
            .resolve_one("Josh Wolf", EntityType::Manager, League::MLS)
            .await
            .unwrap();
        assert_eq!(record["manager_id"], "wolff");
        assert_eq!(record["manager_name"], "Josh Wolff");
    }

    #[tokio::test]
    async fn test_resolve_one_no_match() {
        let (resolver, _) = resolver_with(managers(), 0.35);
        let err = resolver
            .resolve_one("Zzyzx Nonexistent", EntityType::Manager, League::MLS)
            .await
            .unwrap_err();
        assert!(matches!(err, AsaError::NoMatch { league: League::MLS, .. }));
    }

    #[tokio::test]
    async fn test_threshold_rejects_weak_best() {
        // one edit away scores about 0.09
        let (resolver, _) = resolver_with(managers(), 0.05);
        let err = resolver
            .resolve_one("Bruce Arenx", EntityType::Manager, League::MLS)
            .await
            .unwrap_err();
        assert!(matches!(err, AsaError::NoMatch { .. }));
    }

    #[tokio::test]
    async fn test_index_fetched_once() {
        let (resolver, fetcher) = resolver_with(managers(), 0.35);
        for name in ["Josh Wolff", "Bruce Arena", "Josh Wolf"] {
            resolver
                .resolve_one(name, EntityType::Manager, League::MLS)
                .await
                .unwrap();
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_many_order_and_shape() {
        let (resolver, fetcher) = resolver_with(managers(), 0.35);
        let names = vec!["Bruce Arena".to_string(), "Josh Wolff".to_string()];

        let result = resolver
            .resolve_many(&names, EntityType::Manager, &[League::NWSL, League::MLS])
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].league, League::NWSL);
        assert_eq!(result[1].league, League::MLS);
        assert_eq!(result[0].ids, vec!["arena", "wolff"]);
        // one listing fetch per league
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_resolve_many_empty_names_short_circuits() {
        let (resolver, fetcher) = resolver_with(managers(), 0.35);
        let result = resolver
            .resolve_many(&[], EntityType::Player, &[League::MLS, League::NWSL])
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!([{"league": "mls", "players": []}, {"league": "nwsl", "players": []}])
        );
    }

    #[tokio::test]
    async fn test_resolve_many_one_failure_fails_all() {
        let (resolver, _) = resolver_with(managers(), 0.35);
        let names = vec!["Josh Wolff".to_string(), "Zzyzx Nonexistent".to_string()];
        let err = resolver
            .resolve_many(&names, EntityType::Manager, &[League::MLS])
            .await
            .unwrap_err();
        assert!(matches!(err, AsaError::NoMatch { .. }));
    }

    #[test]
    fn test_extract_id() {
        let record = json!({"team_id": "abc", "team_name": "x"});
        let record = record.as_object().unwrap();
        assert_eq!(extract_id(record, EntityType::Team, League::MLS).unwrap(), "abc");
        assert!(extract_id(record, EntityType::Player, League::MLS).is_err());
    }
}
