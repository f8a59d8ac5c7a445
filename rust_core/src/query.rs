//! Typed query parameters for the statistics endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::naming::to_snake_case;

/// A single query-string value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(s) => f.write_str(s),
            QueryValue::Int(i) => write!(f, "{}", i),
            QueryValue::Float(x) => write!(f, "{}", x),
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl QueryValue {
    /// Integer reading of the value, for numeric parameters such as `offset`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Int(i) => Some(*i),
            QueryValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The value as a list of strings; scalars become a one-element list
    pub fn to_list(&self) -> Vec<String> {
        match self {
            QueryValue::List(items) => items.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Str(v)
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<i32> for QueryValue {
    fn from(v: i32) -> Self {
        QueryValue::Int(v as i64)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::Int(v as i64)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Float(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::List(v)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(v: Vec<&str>) -> Self {
        QueryValue::List(v.into_iter().map(str::to_string).collect())
    }
}

/// Ordered set of query parameters. Keys may be given in any case
/// convention; they are translated to snake_case on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a parameter. Replacement keeps the original position.
    pub fn set(&mut self, key: &str, value: impl Into<QueryValue>) {
        let value = value.into();
        let wire = to_snake_case(key);
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| to_snake_case(k) == wire)
        {
            Some(entry) => *entry = (key.to_string(), value),
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        let wire = to_snake_case(key);
        self.entries
            .iter()
            .find(|(k, _)| to_snake_case(k) == wire)
            .map(|(_, v)| v)
    }

    /// Keys as the caller supplied them
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop a parameter, returning its value
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let wire = to_snake_case(key);
        let pos = self.entries.iter().position(|(k, _)| to_snake_case(k) == wire)?;
        Some(self.entries.remove(pos).1)
    }

    /// `(snake_case key, stringified value)` pairs in insertion order
    pub fn to_wire_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (to_snake_case(k), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_stringification() {
        assert_eq!(QueryValue::from(true).to_string(), "true");
        assert_eq!(QueryValue::from(400).to_string(), "400");
        assert_eq!(QueryValue::from(0.5).to_string(), "0.5");
        assert_eq!(QueryValue::from(vec!["a", "b"]).to_string(), "a,b");
    }

    #[test]
    fn test_value_readings() {
        assert_eq!(QueryValue::from(500).as_i64(), Some(500));
        assert_eq!(QueryValue::from(" 20 ").as_i64(), Some(20));
        assert_eq!(QueryValue::from(true).as_i64(), None);
        assert_eq!(QueryValue::from("Josh Wolff").to_list(), vec!["Josh Wolff"]);
        assert_eq!(QueryValue::from(vec!["a", "b"]).to_list(), vec!["a", "b"]);
    }

    #[test]
    fn test_wire_pairs_snake_case() {
        let params = QueryParams::new()
            .with("minimumMinutes", 400)
            .with("season_name", "2021")
            .with("splitByTeams", true);

        assert_eq!(
            params.to_wire_pairs(),
            vec![
                ("minimum_minutes".to_string(), "400".to_string()),
                ("season_name".to_string(), "2021".to_string()),
                ("split_by_teams".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_replaces_across_conventions() {
        let mut params = QueryParams::new().with("seasonName", "2020");
        params.set("season_name", "2021");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("seasonName"), Some(&QueryValue::from("2021")));
    }

    #[test]
    fn test_remove() {
        let mut params = QueryParams::new().with("offset", 1000).with("teamId", "x");
        assert_eq!(params.remove("offset"), Some(QueryValue::Int(1000)));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["teamId"]);
    }
}
