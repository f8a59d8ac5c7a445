//! League configuration for the ASA API.
//!
//! This module provides:
//! - Static metadata for every league partition
//! - Which leagues publish salary data

use crate::types::League;

/// Configuration for a single league.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    pub league: League,
    /// Human-readable competition name
    pub display_name: &'static str,
    /// Whether the players/teams salary endpoints carry data for this league
    pub salaries_published: bool,
}

/// Static configuration for all supported leagues.
pub static LEAGUE_CONFIGS: &[LeagueConfig] = &[
    LeagueConfig {
        league: League::NWSL,
        display_name: "National Women's Soccer League",
        salaries_published: false,
    },
    LeagueConfig {
        league: League::MLS,
        display_name: "Major League Soccer",
        salaries_published: true,
    },
    LeagueConfig {
        league: League::USLC,
        display_name: "USL Championship",
        salaries_published: false,
    },
    LeagueConfig {
        league: League::USL1,
        display_name: "USL League One",
        salaries_published: false,
    },
    // Defunct, historical data only
    LeagueConfig {
        league: League::NASL,
        display_name: "North American Soccer League",
        salaries_published: false,
    },
];

/// Get league configuration by league.
pub fn get_league_config(league: League) -> Option<&'static LeagueConfig> {
    LEAGUE_CONFIGS.iter().find(|c| c.league == league)
}

/// Human-readable name, falling back to the URL tag
pub fn display_name(league: League) -> &'static str {
    get_league_config(league)
        .map(|c| c.display_name)
        .unwrap_or_else(|| league.as_str())
}

/// Leagues whose salary data is public.
pub fn salary_leagues() -> Vec<League> {
    LEAGUE_CONFIGS
        .iter()
        .filter(|c| c.salaries_published)
        .map(|c| c.league)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_league_configured() {
        for league in League::ALL {
            assert!(get_league_config(league).is_some(), "{} missing", league);
        }
        assert_eq!(LEAGUE_CONFIGS.len(), League::ALL.len());
        assert_eq!(display_name(League::USL1), "USL League One");
    }

    #[test]
    fn test_only_mls_salaries() {
        assert_eq!(salary_leagues(), vec![League::MLS]);
    }
}
