//! Statistics endpoint catalog.
//!
//! Each endpoint has a fixed URL fragment, appended to `{base}{league}`, and
//! an allow-list of snake_case query parameter names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::league_config::salary_leagues;
use crate::types::League;

const PLAYERS_XGOALS: &[&str] = &[
    "minimum_minutes",
    "minimum_shots",
    "minimum_key_passes",
    "player_id",
    "team_id",
    "season_name",
    "start_date",
    "end_date",
    "shot_pattern",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
    "stage_name",
    "general_position",
];

const PLAYERS_XPASS: &[&str] = &[
    "minimum_minutes",
    "minimum_passes",
    "player_id",
    "team_id",
    "season_name",
    "start_date",
    "end_date",
    "pass_origin_third",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
    "stage_name",
    "general_position",
];

const PLAYERS_GOALS_ADDED: &[&str] = &[
    "minimum_minutes",
    "player_id",
    "team_id",
    "season_name",
    "start_date",
    "end_date",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
    "stage_name",
    "general_position",
    "action_type",
    "above_replacement",
];

const PLAYERS_SALARIES: &[&str] = &[
    "player_id",
    "team_id",
    "position",
    "season_name",
    "start_date",
    "end_date",
];

const GOALKEEPERS_XGOALS: &[&str] = &[
    "minimum_minutes",
    "minimum_shots_faced",
    "player_id",
    "team_id",
    "season_name",
    "start_date",
    "end_date",
    "shot_pattern",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
    "stage_name",
];

const GOALKEEPERS_GOALS_ADDED: &[&str] = &[
    "minimum_minutes",
    "player_id",
    "team_id",
    "season_name",
    "start_date",
    "end_date",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
    "stage_name",
    "action_type",
    "above_replacement",
];

const TEAMS_XGOALS: &[&str] = &[
    "team_id",
    "season_name",
    "start_date",
    "end_date",
    "shot_pattern",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
    "home_only",
    "away_only",
    "home_adjusted",
    "even_game_state",
    "stage_name",
];

const TEAMS_XPASS: &[&str] = &[
    "team_id",
    "season_name",
    "start_date",
    "end_date",
    "pass_origin_third",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
    "home_only",
    "away_only",
    "stage_name",
];

const TEAMS_GOALS_ADDED: &[&str] = &[
    "team_id",
    "season_name",
    "split_by_seasons",
    "stage_name",
    "action_type",
    "zone",
    "gamestate_trunc",
];

const TEAMS_SALARIES: &[&str] = &[
    "team_id",
    "season_name",
    "split_by_teams",
    "split_by_seasons",
    "split_by_games",
];

const GAMES: &[&str] = &["game_id", "team_id", "season_name", "stage_name"];

const GAMES_XGOALS: &[&str] = &[
    "game_id",
    "season_name",
    "start_date",
    "end_date",
    "stage_name",
];

/// Statistics endpoints exposed by the API
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsEndpoint {
    PlayersXgoals,
    PlayersXpass,
    PlayersGoalsAdded,
    PlayersSalaries,
    GoalkeepersXgoals,
    GoalkeepersGoalsAdded,
    TeamsXgoals,
    TeamsXpass,
    TeamsGoalsAdded,
    TeamsSalaries,
    Games,
    GamesXgoals,
}

impl StatsEndpoint {
    pub const ALL: [StatsEndpoint; 12] = [
        StatsEndpoint::PlayersXgoals,
        StatsEndpoint::PlayersXpass,
        StatsEndpoint::PlayersGoalsAdded,
        StatsEndpoint::PlayersSalaries,
        StatsEndpoint::GoalkeepersXgoals,
        StatsEndpoint::GoalkeepersGoalsAdded,
        StatsEndpoint::TeamsXgoals,
        StatsEndpoint::TeamsXpass,
        StatsEndpoint::TeamsGoalsAdded,
        StatsEndpoint::TeamsSalaries,
        StatsEndpoint::Games,
        StatsEndpoint::GamesXgoals,
    ];

    /// Path appended to `{base}{league}`
    pub fn url_fragment(&self) -> &'static str {
        match self {
            StatsEndpoint::PlayersXgoals => "/players/xgoals",
            StatsEndpoint::PlayersXpass => "/players/xpass",
            StatsEndpoint::PlayersGoalsAdded => "/players/goals-added",
            StatsEndpoint::PlayersSalaries => "/players/salaries",
            StatsEndpoint::GoalkeepersXgoals => "/goalkeepers/xgoals",
            StatsEndpoint::GoalkeepersGoalsAdded => "/goalkeepers/goals-added",
            StatsEndpoint::TeamsXgoals => "/teams/xgoals",
            StatsEndpoint::TeamsXpass => "/teams/xpass",
            StatsEndpoint::TeamsGoalsAdded => "/teams/goals-added",
            StatsEndpoint::TeamsSalaries => "/teams/salaries",
            StatsEndpoint::Games => "/games",
            StatsEndpoint::GamesXgoals => "/games/xgoals",
        }
    }

    /// Recognized query parameter names, snake_case
    pub fn allowed_parameters(&self) -> &'static [&'static str] {
        match self {
            StatsEndpoint::PlayersXgoals => PLAYERS_XGOALS,
            StatsEndpoint::PlayersXpass => PLAYERS_XPASS,
            StatsEndpoint::PlayersGoalsAdded => PLAYERS_GOALS_ADDED,
            StatsEndpoint::PlayersSalaries => PLAYERS_SALARIES,
            StatsEndpoint::GoalkeepersXgoals => GOALKEEPERS_XGOALS,
            StatsEndpoint::GoalkeepersGoalsAdded => GOALKEEPERS_GOALS_ADDED,
            StatsEndpoint::TeamsXgoals => TEAMS_XGOALS,
            StatsEndpoint::TeamsXpass => TEAMS_XPASS,
            StatsEndpoint::TeamsGoalsAdded => TEAMS_GOALS_ADDED,
            StatsEndpoint::TeamsSalaries => TEAMS_SALARIES,
            StatsEndpoint::Games => GAMES,
            StatsEndpoint::GamesXgoals => GAMES_XGOALS,
        }
    }

    pub fn allows(&self, snake_key: &str) -> bool {
        self.allowed_parameters().contains(&snake_key)
    }

    /// Leagues the endpoint publishes data for, when narrower than all
    pub fn restricted_leagues(&self) -> Option<Vec<League>> {
        match self {
            StatsEndpoint::PlayersSalaries | StatsEndpoint::TeamsSalaries => {
                Some(salary_leagues())
            }
            _ => None,
        }
    }
}

impl fmt::Display for StatsEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url_fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_are_rooted() {
        for endpoint in StatsEndpoint::ALL {
            assert!(endpoint.url_fragment().starts_with('/'));
            assert!(!endpoint.allowed_parameters().is_empty());
        }
    }

    #[test]
    fn test_allow_list_lookup() {
        assert!(StatsEndpoint::PlayersXgoals.allows("minimum_minutes"));
        assert!(!StatsEndpoint::PlayersXgoals.allows("minimumMinutes"));
        assert!(!StatsEndpoint::TeamsSalaries.allows("player_id"));
        assert!(StatsEndpoint::TeamsGoalsAdded.allows("gamestate_trunc"));
    }

    #[test]
    fn test_salary_restriction() {
        assert_eq!(
            StatsEndpoint::PlayersSalaries.restricted_leagues(),
            Some(vec![League::MLS])
        );
        assert_eq!(StatsEndpoint::GamesXgoals.restricted_leagues(), None);
    }
}
