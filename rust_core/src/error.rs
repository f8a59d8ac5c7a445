//! Error taxonomy for the client.
//!
//! Every failure a caller can see maps to one `AsaError` variant:
//!
//! - `Validation` - bad league, blank id/name, unknown query key
//! - `Retrieval`  - a league's request came back with status >= 400
//! - `NoMatch`    - no fuzzy candidate inside the acceptance threshold
//! - `Http`       - transport failure before a status was received
//! - `Decode`     - the body was not the JSON shape we expected

use crate::types::{EntityType, League};

#[derive(Debug, thiserror::Error)]
pub enum AsaError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("got a bad response from the server for {league}: {status} ({url})")]
    Retrieval {
        league: League,
        url: String,
        status: u16,
    },

    #[error("name {name} does not match any known {entity_type} in {league}")]
    NoMatch {
        name: String,
        entity_type: EntityType,
        league: League,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl AsaError {
    /// League the failure belongs to, when it is tied to one
    pub fn league(&self) -> Option<League> {
        match self {
            AsaError::Retrieval { league, .. } | AsaError::NoMatch { league, .. } => Some(*league),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AsaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_message() {
        let err = AsaError::Retrieval {
            league: League::NWSL,
            url: "https://example.test/nwsl/players".to_string(),
            status: 503,
        };
        assert_eq!(err.league(), Some(League::NWSL));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_no_match_message() {
        let err = AsaError::NoMatch {
            name: "Zzyzx".to_string(),
            entity_type: EntityType::Player,
            league: League::MLS,
        };
        assert_eq!(
            err.to_string(),
            "name Zzyzx does not match any known player in mls"
        );
    }
}
