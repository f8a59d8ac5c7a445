//! Client for the American Soccer Analysis API.
//!
//! This crate provides:
//! - Typed entry points for entities (players, managers, stadia, referees,
//!   teams) and statistics endpoints (xgoals, xpass, goals added, salaries,
//!   games)
//! - Concurrent fan-out of one request across leagues, with results in
//!   request order
//! - Fuzzy name to id resolution backed by per-league indexes that are
//!   built once and reused for the life of the client
//!
//! ```ignore
//! use itscalledsoccer::{AsaClient, League, QueryParams};
//!
//! let client = AsaClient::new()?;
//! let ids = client
//!     .get_players_by_name(Some(&[League::MLS]), &["Josh Wolff".to_string()])
//!     .await?;
//! let xg = client
//!     .get_players_xgoals(Some(&[League::MLS]), &QueryParams::new().with("seasonName", "2021"))
//!     .await?;
//! ```

mod types;

pub mod clients;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod fanout;
pub mod index_cache;
pub mod league_config;
pub mod logging;
pub mod query;
pub mod resolver;
pub mod utils;
pub mod validation;

pub use clients::{AsaClient, HttpFetch, HttpResponse, ReqwestFetcher};
pub use config::ClientConfig;
pub use endpoints::StatsEndpoint;
pub use error::{AsaError, Result};
pub use query::{QueryParams, QueryValue};
pub use types::*;
pub use validation::ValidationPolicy;
