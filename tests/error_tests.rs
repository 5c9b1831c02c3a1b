// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use query_cache::{CacheConfig, CacheDirective, CacheError, CacheManager, MemoryStore};
use std::sync::Arc;
use thiserror::Error;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        CacheError::InvalidDirective("cache key must not be empty".to_string()),
        CacheError::Store("connection refused".to_string()),
        CacheError::Config("bad backend".to_string()),
        CacheError::Query("record not found".to_string()),
        CacheError::Internal("oops".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_invalid_directive_error() {
    let error = CacheError::InvalidDirective("missing field `key`".to_string());
    assert!(format!("{}", error).contains("missing field `key`"));
    assert!(error.is_cache_failure());
}

#[test]
fn test_query_error_is_not_a_cache_failure() {
    let error = CacheError::Query("unique constraint failed".to_string());
    assert!(format!("{}", error).contains("unique constraint failed"));
    assert!(!error.is_cache_failure());
}

#[test]
fn test_codec_error_conversion() {
    let json_error = serde_json::from_str::<u32>("not a number").unwrap_err();
    let error: CacheError = json_error.into();
    assert!(matches!(error, CacheError::Codec(_)));
}

/// Error type of a host application that embeds the cache
#[derive(Error, Debug)]
enum AppError {
    #[error("user {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[tokio::test]
async fn test_host_errors_propagate_unchanged() {
    let manager = CacheManager::new(CacheConfig::default(), Arc::new(MemoryStore::new()));
    let directive = CacheDirective::new("Gabriel");

    let result: Result<String, AppError> = manager
        .handle("User", "findUniqueOrThrow", Some(&directive), || async {
            Err(AppError::NotFound("Gabriel".to_string()))
        })
        .await;

    match result {
        Err(AppError::NotFound(name)) => assert_eq!(name, "Gabriel"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(manager.store().is_empty());
}

#[tokio::test]
async fn test_directive_errors_convert_into_host_errors() {
    let manager = CacheManager::new(CacheConfig::default(), Arc::new(MemoryStore::new()));
    let directive = CacheDirective::new("");

    let result: Result<String, AppError> = manager
        .handle("User", "findUnique", Some(&directive), || async {
            Ok("unreachable".to_string())
        })
        .await;

    tokio_test::assert_err!(&result);
    assert!(matches!(
        result,
        Err(AppError::Cache(CacheError::InvalidDirective(_)))
    ));
}
