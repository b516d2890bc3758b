// src/secrets/mod.rs
pub mod aws;
pub mod env;

use std::collections::HashMap;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::OnceCell;

use crate::error::SecretError;

pub use aws::AwsSecretsStore;
pub use env::EnvSecretStore;

pub const API_KEY_FIELD: &str = "GUARDIAN_API_KEY";
pub const API_URL_FIELD: &str = "GUARDIAN_URL";

/// Raw secret retrieval by logical name. Implementations return the secret
/// document as text; parsing belongs to [`SecretCache`].
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn fetch_secret(&self, name: &str) -> Result<String, SecretError>;
    fn name(&self) -> &'static str;
}

/// Parsed flat key/value secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSecrets {
    values: HashMap<String, String>,
}

impl CachedSecrets {
    pub fn parse(name: &str, doc: &str) -> Result<Self, SecretError> {
        let values: HashMap<String, String> =
            serde_json::from_str(doc).map_err(|source| SecretError::Malformed {
                name: name.to_string(),
                source,
            })?;
        let secrets = Self { values };
        if secrets.api_key_opt().is_none() {
            return Err(SecretError::MissingField(API_KEY_FIELD));
        }
        Ok(secrets)
    }

    pub fn api_key(&self) -> &str {
        self.api_key_opt().unwrap_or_default()
    }

    pub fn api_url(&self) -> Option<&str> {
        self.get(API_URL_FIELD)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    fn api_key_opt(&self) -> Option<&str> {
        self.get(API_KEY_FIELD)
    }
}

/// Fetch-once credentials for the life of the process.
///
/// The first successful [`get_credentials`](Self::get_credentials) performs a
/// single store retrieval; later calls return the memoized value. A failed
/// first call leaves the cache empty, so the next call retries. Concurrent
/// cold calls are serialized by the cell: only one retrieval runs.
pub struct SecretCache {
    store: Box<dyn SecretStore>,
    secret_name: String,
    cached: OnceCell<CachedSecrets>,
}

impl SecretCache {
    pub fn new(store: Box<dyn SecretStore>, secret_name: impl Into<String>) -> Self {
        Self {
            store,
            secret_name: secret_name.into(),
            cached: OnceCell::new(),
        }
    }

    pub async fn get_credentials(&self) -> Result<&CachedSecrets, SecretError> {
        self.cached
            .get_or_try_init(|| async {
                tracing::info!(
                    store = self.store.name(),
                    secret = %self.secret_name,
                    "retrieving credentials"
                );
                counter!("streamer_secret_fetch_total").increment(1);
                let doc = self.store.fetch_secret(&self.secret_name).await?;
                CachedSecrets::parse(&self.secret_name, &doc)
            })
            .await
    }

    pub fn is_populated(&self) -> bool {
        self.cached.initialized()
    }
}
