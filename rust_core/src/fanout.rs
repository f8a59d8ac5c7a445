//! Multi-league fan-out.
//!
//! One logical request becomes one request per league, all in flight at
//! once. Results come back in the caller's league order regardless of which
//! league answered first; the first failure fails the whole call.

use futures_util::future::try_join_all;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::http::HttpFetch;
use crate::error::{AsaError, Result};
use crate::query::{QueryParams, QueryValue};
use crate::types::{EntityType, League};

/// Run `work` for every league concurrently and collect the results in
/// league order. Fails fast on the first error.
pub async fn fan_out<T, F, Fut>(leagues: &[League], work: F) -> Result<Vec<T>>
where
    F: Fn(League) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    try_join_all(leagues.iter().copied().map(work)).await
}

/// `{base}{league}/{plural}`, plus `?{entity}_id=a,b` when ids are given
pub fn entity_url(base_url: &str, league: League, entity_type: EntityType, ids: &[String]) -> String {
    let mut url = format!("{}{}/{}", base_url, league, entity_type.plural());
    if !ids.is_empty() {
        url.push('?');
        url.push_str(&entity_type.id_field());
        url.push('=');
        url.push_str(&ids.join(","));
    }
    url
}

/// `{base}{league}{fragment}` with every parameter as a snake_case query pair
pub fn stats_url(base_url: &str, league: League, url_fragment: &str, params: &QueryParams) -> Result<String> {
    let raw = format!("{}{}{}", base_url, league, url_fragment);
    if params.is_empty() {
        return Ok(raw);
    }

    let mut url = reqwest::Url::parse(&raw).map_err(|e| {
        AsaError::Validation(format!("cannot build request url {}: {}", raw, e))
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params.to_wire_pairs() {
            pairs.append_pair(&key, &value);
        }
    }
    Ok(url.to_string())
}

/// Issues per-league GETs and concatenates the JSON arrays
#[derive(Clone)]
pub struct FanOut {
    fetcher: Arc<dyn HttpFetch>,
    base_url: String,
    page_size: usize,
}

impl std::fmt::Debug for FanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanOut")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl FanOut {
    pub fn new(fetcher: Arc<dyn HttpFetch>, base_url: &str, page_size: usize) -> Self {
        Self {
            fetcher,
            base_url: base_url.to_string(),
            page_size,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET one URL for one league and require a JSON array back
    pub async fn fetch_array(&self, league: League, url: &str) -> Result<Vec<Value>> {
        let resp = self.fetcher.get_json(url).await?;

        if !resp.is_success() {
            warn!("{} returned {} for {}", url, resp.status, league);
            return Err(AsaError::Retrieval {
                league,
                url: url.to_string(),
                status: resp.status,
            });
        }

        match resp.body {
            Value::Array(rows) => {
                debug!("{} rows from {}", rows.len(), url);
                Ok(rows)
            }
            other => Err(AsaError::Decode {
                url: url.to_string(),
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }

    /// Entity listing for a single league, optionally filtered by ids
    pub async fn fetch_league_entities(
        &self,
        league: League,
        entity_type: EntityType,
        ids: &[String],
    ) -> Result<Vec<Value>> {
        let url = entity_url(&self.base_url, league, entity_type, ids);
        self.fetch_array(league, &url).await
    }

    /// Entities from every league, concatenated in league order
    pub async fn fetch_by_ids(
        &self,
        leagues: &[League],
        entity_type: EntityType,
        ids: &[String],
    ) -> Result<Vec<Value>> {
        info!(
            "Fetching {} across {} leagues ({} ids)",
            entity_type.plural(),
            leagues.len(),
            ids.len()
        );

        let per_league = fan_out(leagues, |league| {
            self.fetch_league_entities(league, entity_type, ids)
        })
        .await?;

        Ok(per_league.into_iter().flatten().collect())
    }

    /// All pages of a statistics endpoint for one league.
    ///
    /// A full page means there may be more rows; the next request carries
    /// `offset` advanced by the number of rows seen so far, starting from the
    /// caller's own `offset` when one is given.
    pub async fn fetch_stats_league(
        &self,
        league: League,
        url_fragment: &str,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        let start = params
            .get("offset")
            .and_then(QueryValue::as_i64)
            .unwrap_or(0);
        let mut rows = Vec::new();

        loop {
            let url = if rows.is_empty() {
                stats_url(&self.base_url, league, url_fragment, params)?
            } else {
                let page_params = params.clone().with("offset", start + rows.len() as i64);
                stats_url(&self.base_url, league, url_fragment, &page_params)?
            };

            let page = self.fetch_array(league, &url).await?;
            let page_len = page.len();
            rows.extend(page);

            if self.page_size == 0 || page_len < self.page_size {
                break;
            }
            debug!(
                "Full page from {}, requesting offset {}",
                url,
                start + rows.len() as i64
            );
        }

        Ok(rows)
    }

    /// Statistics from every league, concatenated in league order
    pub async fn fetch_stats(
        &self,
        leagues: &[League],
        url_fragment: &str,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        info!(
            "Fetching {} across {} leagues ({} params)",
            url_fragment,
            leagues.len(),
            params.len()
        );

        let per_league = fan_out(leagues, |league| {
            self.fetch_stats_league(league, url_fragment, params)
        })
        .await?;

        Ok(per_league.into_iter().flatten().collect())
    }

    /// Statistics where each league carries its own parameters, concatenated
    /// in request order
    pub async fn fetch_stats_each(
        &self,
        url_fragment: &str,
        requests: &[(League, QueryParams)],
    ) -> Result<Vec<Value>> {
        info!(
            "Fetching {} across {} leagues with per-league filters",
            url_fragment,
            requests.len()
        );

        let per_league = try_join_all(
            requests
                .iter()
                .map(|(league, params)| self.fetch_stats_league(*league, url_fragment, params)),
        )
        .await?;

        Ok(per_league.into_iter().flatten().collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
