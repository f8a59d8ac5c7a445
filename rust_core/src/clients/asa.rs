//! Public client for the American Soccer Analysis API.
//!
//! Every entry point takes an optional league set. `None` means every league
//! the endpoint serves; an explicit empty set makes no requests and yields an
//! empty result. Inputs are validated under the configured policy before any
//! request is made.
//!
//! Statistics queries may filter by names instead of ids (`player_names`,
//! `team_names`). Names are resolved per league and each league is queried
//! with its own ids.

use serde_json::Value;
use std::sync::Arc;

use crate::clients::http::{HttpFetch, ReqwestFetcher};
use crate::config::ClientConfig;
use crate::endpoints::StatsEndpoint;
use crate::error::Result;
use crate::fanout::{fan_out, FanOut};
use crate::query::QueryParams;
use crate::resolver::NameResolver;
use crate::types::{EntityRecord, EntityType, League, LeagueIds};
use crate::validation::{
    validate_endpoint_leagues, validate_ids_or_names, validate_string_array,
    validate_url_parameters, ValidationPolicy,
};

/// Entity types whose ids statistics queries accept by name
const NAME_FILTERS: [EntityType; 2] = [EntityType::Player, EntityType::Team];

/// Names to resolve into one id filter of a statistics query
#[derive(Debug, Clone, PartialEq)]
struct NameFilter {
    entity_type: EntityType,
    names: Vec<String>,
}

/// Rewrite the caller's parameters into wire form.
///
/// `{entity}_ids` and `game_ids` become `{entity}_id` and `game_id`.
/// `{entity}_names` are pulled out as filters to resolve, leaving the names
/// under `{entity}_id` so the key still goes through the allow-list.
fn split_name_filters(
    params: &QueryParams,
    policy: ValidationPolicy,
) -> Result<(QueryParams, Vec<NameFilter>)> {
    let mut params = params.clone();
    let mut filters = Vec::new();

    for entity_type in NAME_FILTERS {
        let ids_key = format!("{}_ids", entity_type);
        let names_key = format!("{}_names", entity_type);
        let ids = params.remove(&ids_key).map(|v| v.to_list()).unwrap_or_default();
        let names = params.remove(&names_key).map(|v| v.to_list()).unwrap_or_default();

        policy.enforce(validate_ids_or_names(&ids, &names))?;

        if !names.is_empty() {
            policy.enforce(validate_string_array(&names, &names_key))?;
            params.set(&entity_type.id_field(), names.clone());
            filters.push(NameFilter { entity_type, names });
        } else if !ids.is_empty() {
            params.set(&entity_type.id_field(), ids);
        }
    }

    if let Some(game_ids) = params.remove("game_ids") {
        params.set("game_id", game_ids);
    }

    Ok((params, filters))
}

#[derive(Debug)]
pub struct AsaClient {
    config: ClientConfig,
    fanout: Arc<FanOut>,
    resolver: NameResolver,
}

impl AsaClient {
    /// Client against the public API with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = ReqwestFetcher::from_config(&config)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Client over a custom transport
    pub fn with_fetcher(config: ClientConfig, fetcher: Arc<dyn HttpFetch>) -> Self {
        let fanout = Arc::new(FanOut::new(fetcher, &config.base_url, config.page_size));
        let resolver = NameResolver::new(fanout.clone(), config.minimum_match_score);
        Self {
            config,
            fanout,
            resolver,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    fn leagues_or_all(leagues: Option<&[League]>) -> Vec<League> {
        leagues.map_or_else(|| League::ALL.to_vec(), <[League]>::to_vec)
    }

    // ------------------------------------------------------------------
    // Generic entry points
    // ------------------------------------------------------------------

    /// Records of `entity_type` in every league, filtered by `ids` when given
    pub async fn get_entities(
        &self,
        entity_type: EntityType,
        leagues: Option<&[League]>,
        ids: &[String],
    ) -> Result<Vec<Value>> {
        let policy = self.config.validation;
        policy.enforce(validate_string_array(ids, "ids"))?;

        let leagues = Self::leagues_or_all(leagues);
        self.fanout.fetch_by_ids(&leagues, entity_type, ids).await
    }

    /// Ids matching `names` in every league, one entry per league
    pub async fn get_entity_ids_by_name(
        &self,
        entity_type: EntityType,
        leagues: Option<&[League]>,
        names: &[String],
    ) -> Result<Vec<LeagueIds>> {
        let policy = self.config.validation;
        policy.enforce(validate_string_array(names, "names"))?;

        let leagues = Self::leagues_or_all(leagues);
        self.resolver
            .resolve_many(names, entity_type, &leagues)
            .await
    }

    /// Best-matching record for one name in one league
    pub async fn find_entity(
        &self,
        entity_type: EntityType,
        league: League,
        name: &str,
    ) -> Result<EntityRecord> {
        self.resolver.resolve_one(name, entity_type, league).await
    }

    /// Records looked up by ids or by names (never both). Names are resolved
    /// per league and each league is then queried for its own ids.
    pub async fn get_entities_by_ids_or_names(
        &self,
        entity_type: EntityType,
        leagues: Option<&[League]>,
        ids: &[String],
        names: &[String],
    ) -> Result<Vec<Value>> {
        let policy = self.config.validation;
        policy.enforce(validate_ids_or_names(ids, names))?;

        if names.is_empty() {
            return self.get_entities(entity_type, leagues, ids).await;
        }

        let resolved = self
            .get_entity_ids_by_name(entity_type, leagues, names)
            .await?;
        let resolved_leagues: Vec<League> = resolved.iter().map(|r| r.league).collect();

        let per_league = fan_out(&resolved_leagues, |league| {
            let ids = resolved
                .iter()
                .find(|r| r.league == league)
                .map(|r| r.ids.as_slice())
                .unwrap_or_default();
            self.fanout.fetch_league_entities(league, entity_type, ids)
        })
        .await?;

        Ok(per_league.into_iter().flatten().collect())
    }

    /// Rows of a statistics endpoint across leagues. `None` means every
    /// league the endpoint publishes.
    pub async fn get_stats(
        &self,
        endpoint: StatsEndpoint,
        leagues: Option<&[League]>,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        let leagues = match leagues {
            Some(leagues) => leagues.to_vec(),
            None => endpoint
                .restricted_leagues()
                .unwrap_or_else(|| League::ALL.to_vec()),
        };
        let policy = self.config.validation;
        policy.enforce(validate_endpoint_leagues(endpoint, &leagues))?;

        let (params, filters) = split_name_filters(params, policy)?;
        policy.enforce(validate_url_parameters(endpoint, &params))?;

        if filters.is_empty() {
            return self
                .fanout
                .fetch_stats(&leagues, endpoint.url_fragment(), &params)
                .await;
        }

        let mut requests: Vec<(League, QueryParams)> = leagues
            .iter()
            .map(|&league| (league, params.clone()))
            .collect();

        for filter in &filters {
            let resolved = self
                .resolver
                .resolve_many(&filter.names, filter.entity_type, &leagues)
                .await?;
            for ((_, league_params), league_ids) in requests.iter_mut().zip(resolved) {
                league_params.set(&filter.entity_type.id_field(), league_ids.ids);
            }
        }

        self.fanout
            .fetch_stats_each(endpoint.url_fragment(), &requests)
            .await
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    pub async fn get_players(&self, leagues: Option<&[League]>, ids: &[String]) -> Result<Vec<Value>> {
        self.get_entities(EntityType::Player, leagues, ids).await
    }

    pub async fn get_players_by_name(
        &self,
        leagues: Option<&[League]>,
        names: &[String],
    ) -> Result<Vec<LeagueIds>> {
        self.get_entity_ids_by_name(EntityType::Player, leagues, names)
            .await
    }

    pub async fn get_managers(&self, leagues: Option<&[League]>, ids: &[String]) -> Result<Vec<Value>> {
        self.get_entities(EntityType::Manager, leagues, ids).await
    }

    pub async fn get_managers_by_name(
        &self,
        leagues: Option<&[League]>,
        names: &[String],
    ) -> Result<Vec<LeagueIds>> {
        self.get_entity_ids_by_name(EntityType::Manager, leagues, names)
            .await
    }

    pub async fn get_stadia(&self, leagues: Option<&[League]>, ids: &[String]) -> Result<Vec<Value>> {
        self.get_entities(EntityType::Stadium, leagues, ids).await
    }

    pub async fn get_stadia_by_name(
        &self,
        leagues: Option<&[League]>,
        names: &[String],
    ) -> Result<Vec<LeagueIds>> {
        self.get_entity_ids_by_name(EntityType::Stadium, leagues, names)
            .await
    }

    pub async fn get_referees(&self, leagues: Option<&[League]>, ids: &[String]) -> Result<Vec<Value>> {
        self.get_entities(EntityType::Referee, leagues, ids).await
    }

    pub async fn get_referees_by_name(
        &self,
        leagues: Option<&[League]>,
        names: &[String],
    ) -> Result<Vec<LeagueIds>> {
        self.get_entity_ids_by_name(EntityType::Referee, leagues, names)
            .await
    }

    pub async fn get_teams(&self, leagues: Option<&[League]>, ids: &[String]) -> Result<Vec<Value>> {
        self.get_entities(EntityType::Team, leagues, ids).await
    }

    pub async fn get_teams_by_name(
        &self,
        leagues: Option<&[League]>,
        names: &[String],
    ) -> Result<Vec<LeagueIds>> {
        self.get_entity_ids_by_name(EntityType::Team, leagues, names)
            .await
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    pub async fn get_players_xgoals(&self, leagues: Option<&[League]>, params: &QueryParams) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::PlayersXgoals, leagues, params).await
    }

    pub async fn get_players_xpass(&self, leagues: Option<&[League]>, params: &QueryParams) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::PlayersXpass, leagues, params).await
    }

    pub async fn get_players_goals_added(
        &self,
        leagues: Option<&[League]>,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::PlayersGoalsAdded, leagues, params)
            .await
    }

    /// `None` means every league that publishes salaries
    pub async fn get_players_salaries(
        &self,
        leagues: Option<&[League]>,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::PlayersSalaries, leagues, params)
            .await
    }

    pub async fn get_goalkeepers_xgoals(
        &self,
        leagues: Option<&[League]>,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::GoalkeepersXgoals, leagues, params)
            .await
    }

    pub async fn get_goalkeepers_goals_added(
        &self,
        leagues: Option<&[League]>,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::GoalkeepersGoalsAdded, leagues, params)
            .await
    }

    pub async fn get_teams_xgoals(&self, leagues: Option<&[League]>, params: &QueryParams) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::TeamsXgoals, leagues, params).await
    }

    pub async fn get_teams_xpass(&self, leagues: Option<&[League]>, params: &QueryParams) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::TeamsXpass, leagues, params).await
    }

    pub async fn get_teams_goals_added(
        &self,
        leagues: Option<&[League]>,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::TeamsGoalsAdded, leagues, params)
            .await
    }

    /// `None` means every league that publishes salaries
    pub async fn get_teams_salaries(
        &self,
        leagues: Option<&[League]>,
        params: &QueryParams,
    ) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::TeamsSalaries, leagues, params)
            .await
    }

    pub async fn get_games(&self, leagues: Option<&[League]>, params: &QueryParams) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::Games, leagues, params).await
    }

    pub async fn get_games_xgoals(&self, leagues: Option<&[League]>, params: &QueryParams) -> Result<Vec<Value>> {
        self.get_stats(StatsEndpoint::GamesXgoals, leagues, params).await
    }
}
