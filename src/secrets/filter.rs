//! Filter expressions for `secret ls --filter`
//!
//! A filter flag holds comma-separated `key=value` clauses. A secret is kept
//! only when every clause matches it; two clauses on the same key are two
//! separate conditions, not alternatives.

use crate::secrets::Secret;
use crate::utils::errors::SecretError;
use std::collections::BTreeMap;

/// A single compiled filter clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    /// Name contains the value
    Name(String),
    /// Driver equals the value
    Driver(String),
    /// Scope equals the value
    Scope(String),
    /// Label key present, and equal to the value when one is given
    Label { key: String, value: Option<String> },
    /// Option key present, and equal to the value when one is given
    Opt { key: String, value: Option<String> },
}

impl FilterClause {
    /// Compile one `key=value` clause
    pub fn parse(clause: &str) -> Result<Self, SecretError> {
        let (key, value) = clause
            .split_once('=')
            .ok_or_else(|| SecretError::MalformedFilter(clause.to_string()))?;

        let value = value.to_string();
        match key {
            "name" => Ok(FilterClause::Name(value)),
            "driver" => Ok(FilterClause::Driver(value)),
            "scope" => Ok(FilterClause::Scope(value)),
            "label" => {
                let (key, value) = split_pair(&value);
                Ok(FilterClause::Label { key, value })
            }
            "opt" => {
                let (key, value) = split_pair(&value);
                Ok(FilterClause::Opt { key, value })
            }
            other => Err(SecretError::InvalidFilterKey(other.to_string())),
        }
    }

    pub fn matches(&self, secret: &Secret) -> bool {
        match self {
            FilterClause::Name(value) => secret.name.contains(value.as_str()),
            FilterClause::Driver(value) => secret.driver == *value,
            FilterClause::Scope(value) => secret.scope == *value,
            FilterClause::Label { key, value } => {
                map_matches(&secret.labels, key, value.as_deref())
            }
            FilterClause::Opt { key, value } => map_matches(&secret.options, key, value.as_deref()),
        }
    }
}

/// `foo=bar` yields `(foo, Some(bar))`, `foo=` yields `(foo, Some(""))`
/// and a bare `foo` yields `(foo, None)`
fn split_pair(input: &str) -> (String, Option<String>) {
    match input.split_once('=') {
        Some((key, value)) => (key.to_string(), Some(value.to_string())),
        None => (input.to_string(), None),
    }
}

fn map_matches(map: &BTreeMap<String, String>, key: &str, value: Option<&str>) -> bool {
    match (map.get(key), value) {
        (Some(_), None) => true,
        (Some(actual), Some(expected)) => actual == expected,
        (None, _) => false,
    }
}

/// Conjunction of filter clauses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretFilter {
    clauses: Vec<FilterClause>,
}

impl SecretFilter {
    /// Compile filter flag values; each value may carry several
    /// comma-separated clauses
    pub fn parse<S: AsRef<str>>(inputs: &[S]) -> Result<Self, SecretError> {
        let mut clauses = Vec::new();
        for input in inputs {
            let input = input.as_ref();
            if input.is_empty() {
                continue;
            }
            for clause in input.split(',') {
                clauses.push(FilterClause::parse(clause)?);
            }
        }
        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, secret: &Secret) -> bool {
        self.clauses.iter().all(|clause| clause.matches(secret))
    }

    /// Keep matching secrets, in their original order
    pub fn apply(&self, secrets: Vec<Secret>) -> Vec<Secret> {
        secrets.into_iter().filter(|s| self.matches(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Secret> {
        vec![
            Secret::new("db-password", "local")
                .with_label("env", "prod")
                .with_option("mode", "0400"),
            Secret::new("db-user", "vault").with_label("env", "dev"),
            Secret::new("api-token", "local")
                .with_label("team", "")
                .with_scope("global"),
        ]
    }

    fn names(secrets: &[Secret]) -> Vec<&str> {
        secrets.iter().map(|s| s.name.as_str()).collect()
    }

    fn filtered(inputs: &[&str]) -> Vec<String> {
        let filter = SecretFilter::parse(inputs).unwrap();
        names(&filter.apply(sample()))
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_name_is_substring_match() {
        assert_eq!(filtered(&["name=db"]), vec!["db-password", "db-user"]);
        assert_eq!(filtered(&["name=token"]), vec!["api-token"]);
    }

    #[test]
    fn test_driver_and_scope_are_exact() {
        assert_eq!(filtered(&["driver=vault"]), vec!["db-user"]);
        assert!(filtered(&["driver=vau"]).is_empty());
        assert_eq!(filtered(&["scope=global"]), vec!["api-token"]);
    }

    #[test]
    fn test_label_with_and_without_value() {
        assert_eq!(filtered(&["label=env=prod"]), vec!["db-password"]);
        assert_eq!(filtered(&["label=env"]), vec!["db-password", "db-user"]);
        assert!(filtered(&["label=env=staging"]).is_empty());
    }

    #[test]
    fn test_label_with_empty_value_matches_only_empty() {
        assert_eq!(filtered(&["label=team="]), vec!["api-token"]);
        assert!(filtered(&["label=env="]).is_empty());
    }

    #[test]
    fn test_opt_filter() {
        assert_eq!(filtered(&["opt=mode"]), vec!["db-password"]);
        assert_eq!(filtered(&["opt=mode=0400"]), vec!["db-password"]);
        assert!(filtered(&["opt=mode=0600"]).is_empty());
    }

    #[test]
    fn test_clauses_are_conjunctive() {
        assert_eq!(filtered(&["name=db,driver=local"]), vec!["db-password"]);
        assert_eq!(filtered(&["name=db", "label=env=dev"]), vec!["db-user"]);
        // same key twice narrows rather than widens
        assert!(filtered(&["label=env=prod,label=env=dev"]).is_empty());
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = SecretFilter::parse::<&str>(&[]).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(sample()).len(), 3);
    }

    #[test]
    fn test_malformed_clause() {
        let err = SecretFilter::parse(&["name"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "filter input must be in the form of filter=value: name is invalid"
        );

        let err = SecretFilter::parse(&["name=a,"]).unwrap_err();
        assert!(matches!(err, SecretError::MalformedFilter(c) if c.is_empty()));
    }

    #[test]
    fn test_unknown_key_always_errors() {
        for input in ["color=red", "color=", "Name=db", "labels=a=b"] {
            let err = SecretFilter::parse(&[input]).unwrap_err();
            assert!(matches!(err, SecretError::InvalidFilterKey(_)), "{input}");
        }
        let err = SecretFilter::parse(&["name=db,color=red"]).unwrap_err();
        assert_eq!(err.to_string(), "color is an invalid filter");
    }

    #[test]
    fn test_filter_is_sound_and_complete() {
        let filter = SecretFilter::parse(&["label=env", "driver=local"]).unwrap();
        let all = sample();
        let kept = filter.apply(all.clone());
        assert!(kept.len() <= all.len());
        for secret in &all {
            let every = filter.clauses().iter().all(|c| c.matches(secret));
            assert_eq!(kept.contains(secret), every);
        }
    }
}
