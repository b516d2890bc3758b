// src/secrets/env.rs
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{SecretStore, API_KEY_FIELD, API_URL_FIELD};
use crate::error::SecretError;

/// Serves credentials from the process environment (after `.env` loading).
/// Used for local runs where no secret manager is reachable.
#[derive(Debug, Clone)]
pub struct EnvSecretStore {
    keys: Vec<String>,
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::with_keys([API_KEY_FIELD, API_URL_FIELD])
    }
}

impl EnvSecretStore {
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn fetch_secret(&self, _name: &str) -> Result<String, SecretError> {
        let mut doc = Map::new();
        for key in &self.keys {
            if let Ok(v) = std::env::var(key) {
                doc.insert(key.clone(), Value::String(v));
            }
        }
        Ok(Value::Object(doc).to_string())
    }

    fn name(&self) -> &'static str {
        "env"
    }
}
