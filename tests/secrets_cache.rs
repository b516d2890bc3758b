// tests/secrets_cache.rs
mod common;

use common::{key_only_secret, CountingStore};
use guardian_article_streamer::error::SecretError;
use guardian_article_streamer::secrets::EnvSecretStore;
use guardian_article_streamer::SecretCache;
use serde_json::json;

#[tokio::test]
async fn second_call_does_no_io() {
    let store = CountingStore::new(key_only_secret());
    let cache = SecretCache::new(Box::new(store.clone()), "s");

    let first = cache.get_credentials().await.expect("first").clone();
    let second = cache.get_credentials().await.expect("second").clone();

    assert_eq!(first, second);
    assert_eq!(store.hits(), 1, "exactly one underlying retrieval");
    assert!(cache.is_populated());
}

#[tokio::test]
async fn failed_first_call_leaves_cache_empty_for_retry() {
    let store = CountingStore::failing_once(key_only_secret());
    let cache = SecretCache::new(Box::new(store.clone()), "s");

    let err = cache.get_credentials().await.unwrap_err();
    assert!(matches!(err, SecretError::Unavailable { .. }));
    assert!(!cache.is_populated());

    let creds = cache.get_credentials().await.expect("retry succeeds");
    assert_eq!(creds.api_key(), common::API_KEY);
    assert_eq!(store.hits(), 2);
}

#[tokio::test]
async fn malformed_document_is_not_cached() {
    let store = CountingStore::new(json!(["not", "a", "map"]));
    let cache = SecretCache::new(Box::new(store.clone()), "s");

    assert!(matches!(
        cache.get_credentials().await,
        Err(SecretError::Malformed { .. })
    ));
    assert!(cache.get_credentials().await.is_err());
    assert_eq!(store.hits(), 2);
}

#[serial_test::serial]
#[tokio::test]
async fn env_store_serves_guardian_fields() {
    std::env::set_var("GUARDIAN_API_KEY", "from-env");
    std::env::set_var("GUARDIAN_URL", "https://content.example/search");

    let cache = SecretCache::new(Box::new(EnvSecretStore::default()), "ignored");
    let creds = cache.get_credentials().await.expect("env creds");
    assert_eq!(creds.api_key(), "from-env");
    assert_eq!(creds.api_url(), Some("https://content.example/search"));

    std::env::remove_var("GUARDIAN_API_KEY");
    std::env::remove_var("GUARDIAN_URL");
}

#[serial_test::serial]
#[tokio::test]
async fn env_store_without_key_is_missing_field() {
    std::env::remove_var("GUARDIAN_API_KEY");
    let cache = SecretCache::new(Box::new(EnvSecretStore::default()), "ignored");
    assert!(matches!(
        cache.get_credentials().await,
        Err(SecretError::MissingField("GUARDIAN_API_KEY"))
    ));
}
