//! Input validation for the client facade.
//!
//! Validators return `AsaError::Validation`; what happens next is decided by
//! the configured [`ValidationPolicy`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::endpoints::StatsEndpoint;
use crate::error::{AsaError, Result};
use crate::league_config::display_name;
use crate::query::QueryParams;
use crate::types::League;
use crate::utils::naming::to_snake_case;

/// How validation failures are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Fail the call with the validation error
    #[default]
    Strict,
    /// Log the failure and carry on with the input as given
    Lenient,
}

impl ValidationPolicy {
    /// Apply the policy to a validator's outcome.
    pub fn enforce(self, outcome: Result<()>) -> Result<()> {
        match (self, outcome) {
            (_, Ok(())) => Ok(()),
            (ValidationPolicy::Strict, Err(e)) => Err(e),
            (ValidationPolicy::Lenient, Err(e)) => {
                warn!("Ignoring invalid input: {}", e);
                Ok(())
            }
        }
    }
}

impl FromStr for ValidationPolicy {
    type Err = AsaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ValidationPolicy::Strict),
            "lenient" => Ok(ValidationPolicy::Lenient),
            other => Err(AsaError::Validation(format!(
                "validation policy must be strict or lenient, got {}",
                other
            ))),
        }
    }
}

/// Parse league tags, failing on the first unknown one.
pub fn validate_leagues<S: AsRef<str>>(leagues: &[S]) -> Result<Vec<League>> {
    leagues.iter().map(|l| l.as_ref().parse()).collect()
}

/// Parse league tags under a policy. Lenient mode drops unknown tags, since
/// they cannot be addressed.
pub fn parse_leagues<S: AsRef<str>>(leagues: &[S], policy: ValidationPolicy) -> Result<Vec<League>> {
    let mut parsed = Vec::with_capacity(leagues.len());
    for tag in leagues {
        match tag.as_ref().parse::<League>() {
            Ok(league) => parsed.push(league),
            Err(e) => policy.enforce(Err(e))?,
        }
    }
    Ok(parsed)
}

/// Every entry must be a non-blank string.
pub fn validate_string_array(values: &[String], what: &str) -> Result<()> {
    match values.iter().position(|v| v.trim().is_empty()) {
        Some(idx) => Err(AsaError::Validation(format!(
            "{} must be an array of non-empty strings, got {:?} at index {}",
            what, values[idx], idx
        ))),
        None => Ok(()),
    }
}

/// Every query key, once snake_cased, must be on the endpoint's allow-list.
pub fn validate_url_parameters(endpoint: StatsEndpoint, params: &QueryParams) -> Result<()> {
    for key in params.keys() {
        if !endpoint.allows(&to_snake_case(key)) {
            return Err(AsaError::Validation(format!(
                "Url parameters must be one of {}, got {}",
                endpoint.allowed_parameters().join(", "),
                key
            )));
        }
    }
    Ok(())
}

/// Endpoints with partial league coverage reject the other leagues.
pub fn validate_endpoint_leagues(endpoint: StatsEndpoint, leagues: &[League]) -> Result<()> {
    if let Some(allowed) = endpoint.restricted_leagues() {
        if let Some(bad) = leagues.iter().find(|l| !allowed.contains(*l)) {
            return Err(AsaError::Validation(format!(
                "{} is only published for {}, got {}",
                endpoint,
                allowed
                    .iter()
                    .map(|l| format!("{} ({})", display_name(*l), l))
                    .collect::<Vec<_>>()
                    .join(", "),
                bad
            )));
        }
    }
    Ok(())
}

/// Entities are looked up by ids or by names, never both.
pub fn validate_ids_or_names(ids: &[String], names: &[String]) -> Result<()> {
    if !ids.is_empty() && !names.is_empty() {
        return Err(AsaError::Validation(
            "please specify only ids or names, not both".to_string(),
        ));
    }
    Ok(())
}
