//! Per-call cache directives.
//!
//! A directive travels next to the domain arguments of a single call and is
//! never persisted. Hosts that receive one merged argument object (a `cache`
//! field beside the query arguments) split it with [`split_directive`] before
//! the query runs.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{CacheError, Result};
use crate::operations::OperationKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Name of the argument field that carries the directive.
pub const DIRECTIVE_FIELD: &str = "cache";

/// Longest expiry a directive or the engine default may ask for (one year).
pub const MAX_TTL_SECONDS: u64 = 60 * 60 * 24 * 365;

/// Caching instructions attached to one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheDirective {
    /// Caller-chosen key, namespaced by model name in the store.
    pub key: String,

    /// Seconds until the stored entry expires. Reads, creates and
    /// refreshing updates only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,

    /// Update operations only: `true` refreshes the entry with the write
    /// result, anything else evicts it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<bool>,
}

impl CacheDirective {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ttl: None,
            update: None,
        }
    }

    pub fn with_ttl(mut self, seconds: u64) -> Self {
        self.ttl = Some(seconds);
        self
    }

    /// Refresh the cached entry with the result of an update.
    pub fn refresh(mut self) -> Self {
        self.update = Some(true);
        self
    }

    /// Evict the cached entry after an update.
    pub fn evict(mut self) -> Self {
        self.update = Some(false);
        self
    }

    pub fn refreshes(&self) -> bool {
        self.update == Some(true)
    }

    /// Expiry for a stored entry, falling back to `default` when unset.
    pub fn ttl_or(&self, default: Duration) -> Duration {
        self.ttl.map(Duration::from_secs).unwrap_or(default)
    }

    /// Check that this directive makes sense for an operation of `kind`.
    pub fn validate_for(&self, kind: OperationKind) -> Result<()> {
        if self.key.is_empty() {
            return Err(CacheError::InvalidDirective(
                "cache key must not be empty".to_string(),
            ));
        }

        if let Some(ttl) = self.ttl {
            if ttl == 0 || ttl > MAX_TTL_SECONDS {
                return Err(CacheError::InvalidDirective(format!(
                    "ttl must be between 1 and {} seconds, got {} (key: {})",
                    MAX_TTL_SECONDS, ttl, self.key
                )));
            }
        }

        if self.update.is_some() && kind != OperationKind::Update {
            return Err(CacheError::InvalidDirective(format!(
                "`update` only applies to update operations, not {} (key: {})",
                kind, self.key
            )));
        }

        if self.ttl.is_some() {
            match kind {
                OperationKind::Delete => {
                    return Err(CacheError::InvalidDirective(format!(
                        "`ttl` does not apply to delete operations (key: {})",
                        self.key
                    )));
                }
                OperationKind::Update if !self.refreshes() => {
                    return Err(CacheError::InvalidDirective(format!(
                        "`ttl` requires `update: true` on update operations (key: {})",
                        self.key
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Store key for a directive key under a model namespace: `<model>:<key>`.
pub fn composite_key(model: &str, key: &str) -> String {
    format!("{}:{}", model, key)
}

/// Split a merged argument object into its directive and domain arguments.
///
/// The `cache` field is removed from `args`. A missing or `null` field means
/// no directive. Arguments that are not an object cannot carry a directive
/// and are returned untouched.
pub fn split_directive(args: Value) -> Result<(Option<CacheDirective>, Value)> {
    match args {
        Value::Object(mut map) => {
            let directive = match map.remove(DIRECTIVE_FIELD) {
                None | Some(Value::Null) => None,
                Some(raw) => Some(
                    serde_json::from_value::<CacheDirective>(raw)
                        .map_err(|e| CacheError::InvalidDirective(e.to_string()))?,
                ),
            };
            Ok((directive, Value::Object(map)))
        }
        other => Ok((None, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key("User", "Gabriel"), "User:Gabriel");
        assert_eq!(composite_key("Post", "a:b"), "Post:a:b");
    }

    #[test]
    fn test_ttl_fallback() {
        let default = Duration::from_secs(900);
        assert_eq!(CacheDirective::new("k").ttl_or(default), default);
        assert_eq!(
            CacheDirective::new("k").with_ttl(30).ttl_or(default),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn test_validation_rules() {
        assert!(CacheDirective::new("k").validate_for(OperationKind::Read).is_ok());
        assert!(CacheDirective::new("k").with_ttl(5).validate_for(OperationKind::Create).is_ok());
        assert!(CacheDirective::new("k").refresh().with_ttl(5).validate_for(OperationKind::Update).is_ok());
        assert!(CacheDirective::new("k").evict().validate_for(OperationKind::Update).is_ok());
        assert!(CacheDirective::new("k").validate_for(OperationKind::Delete).is_ok());

        assert!(CacheDirective::new("").validate_for(OperationKind::Read).is_err());
        assert!(CacheDirective::new("k").with_ttl(0).validate_for(OperationKind::Read).is_err());
        assert!(CacheDirective::new("k").refresh().validate_for(OperationKind::Read).is_err());
        assert!(CacheDirective::new("k").evict().validate_for(OperationKind::Delete).is_err());
        assert!(CacheDirective::new("k").with_ttl(5).validate_for(OperationKind::Delete).is_err());
        assert!(CacheDirective::new("k").with_ttl(5).validate_for(OperationKind::Update).is_err());
    }

    #[test]
    fn test_ttl_bounds() {
        let at_limit = CacheDirective::new("k").with_ttl(MAX_TTL_SECONDS);
        assert!(at_limit.validate_for(OperationKind::Read).is_ok());

        for ttl in [MAX_TTL_SECONDS + 1, u64::MAX] {
            let result = CacheDirective::new("k").with_ttl(ttl).validate_for(OperationKind::Create);
            assert!(matches!(result, Err(CacheError::InvalidDirective(_))), "{}", ttl);
        }
    }

    #[test]
    fn test_split_strips_directive() {
        let args = json!({
            "where": { "username": "Gabriel" },
            "cache": { "key": "Gabriel", "ttl": 60 }
        });

        let (directive, rest) = split_directive(args).unwrap();
        assert_eq!(directive, Some(CacheDirective::new("Gabriel").with_ttl(60)));
        assert_eq!(rest, json!({ "where": { "username": "Gabriel" } }));
    }

    #[test]
    fn test_split_without_directive() {
        let (directive, rest) = split_directive(json!({ "take": 10 })).unwrap();
        assert!(directive.is_none());
        assert_eq!(rest, json!({ "take": 10 }));

        let (directive, rest) = split_directive(json!({ "cache": null })).unwrap();
        assert!(directive.is_none());
        assert_eq!(rest, json!({}));

        let (directive, rest) = split_directive(Value::Null).unwrap();
        assert!(directive.is_none());
        assert_eq!(rest, Value::Null);
    }

    #[test]
    fn test_split_rejects_malformed_directive() {
        let missing_key = split_directive(json!({ "cache": { "ttl": 5 } }));
        assert!(matches!(missing_key, Err(CacheError::InvalidDirective(_))));

        let unknown_field = split_directive(json!({ "cache": { "key": "k", "tll": 5 } }));
        assert!(matches!(unknown_field, Err(CacheError::InvalidDirective(_))));

        let wrong_type = split_directive(json!({ "cache": "Gabriel" }));
        assert!(matches!(wrong_type, Err(CacheError::InvalidDirective(_))));
    }
}
