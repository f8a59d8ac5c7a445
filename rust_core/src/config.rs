//! Client configuration.
//!
//! Defaults target the public ASA API. `from_env` overlays:
//! - `ASA_BASE_URL`
//! - `ASA_MIN_MATCH_SCORE` (acceptance threshold, 0..=1)
//! - `ASA_TIMEOUT_SECS`
//! - `ASA_VALIDATION` (`strict` | `lenient`)
//! - `ASA_PROXY`
//! - `ASA_PAGE_SIZE`

use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

use crate::error::AsaError;
use crate::validation::ValidationPolicy;

pub const API_VERSION: &str = "v1";

/// Default API root; league and path segments are appended directly
pub const DEFAULT_BASE_URL: &str = "https://app.americansocceranalysis.com/api/v1/";

/// Default maximum dissimilarity a fuzzy match may have and still resolve
pub const DEFAULT_MIN_MATCH_SCORE: f64 = 0.35;

/// Rows per page served by the API
pub const MAX_API_LIMIT: usize = 1000;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENT: &str = concat!("itscalledsoccer-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Always ends with `/`
    pub base_url: String,
    /// Acceptance threshold for name resolution; lower is stricter
    pub minimum_match_score: f64,
    pub timeout: Duration,
    pub user_agent: String,
    pub validation: ValidationPolicy,
    pub proxy: Option<String>,
    /// A page this long triggers a follow-up request with `offset`; 0 disables paging
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            minimum_match_score: DEFAULT_MIN_MATCH_SCORE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            validation: ValidationPolicy::Strict,
            proxy: None,
            page_size: MAX_API_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `.env` and the environment, on top of defaults
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = env::var("ASA_BASE_URL") {
            config = config.with_base_url(&url);
        }
        if let Some(score) = parse_var::<f64>("ASA_MIN_MATCH_SCORE")? {
            config.minimum_match_score = score;
        }
        if let Some(secs) = parse_var::<u64>("ASA_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(policy) = env::var("ASA_VALIDATION") {
            config.validation = policy.parse()?;
        }
        if let Ok(proxy) = env::var("ASA_PROXY") {
            if !proxy.trim().is_empty() {
                config.proxy = Some(proxy.trim().to_string());
            }
        }
        if let Some(page_size) = parse_var::<usize>("ASA_PAGE_SIZE")? {
            config.page_size = page_size;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        let mut url = url.trim().to_string();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    pub fn with_minimum_match_score(mut self, score: f64) -> Self {
        self.minimum_match_score = score;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_validation(mut self, policy: ValidationPolicy) -> Self {
        self.validation = policy;
        self
    }

    pub fn with_proxy(mut self, proxy: &str) -> Self {
        self.proxy = Some(proxy.to_string());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Check invariants the client relies on
    pub fn validate(&self) -> std::result::Result<(), AsaError> {
        if !(0.0..=1.0).contains(&self.minimum_match_score) {
            return Err(AsaError::Validation(format!(
                "minimum match score must be between 0 and 1, got {}",
                self.minimum_match_score
            )));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AsaError::Validation(format!(
                "base url must be http(s), got {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

/// Parse an optional environment variable
fn parse_var<T: std::str::FromStr>(var_name: &str) -> Result<Option<T>> {
    match env::var(var_name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{} has an invalid value: {}", var_name, val)),
        Err(_) => Ok(None),
    }
}
