// src/secrets/aws.rs
use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;
use tokio::sync::OnceCell;

use super::SecretStore;
use crate::error::SecretError;

/// AWS Secrets Manager backed store. The SDK client is built on first use
/// and reused for the rest of the process.
pub struct AwsSecretsStore {
    region: String,
    client: OnceCell<Client>,
}

impl AwsSecretsStore {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                tracing::debug!(region = %self.region, "building secrets manager client");
                let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(self.region.clone()))
                    .load()
                    .await;
                Client::new(&sdk_config)
            })
            .await
    }
}

#[async_trait]
impl SecretStore for AwsSecretsStore {
    async fn fetch_secret(&self, name: &str) -> Result<String, SecretError> {
        let out = self
            .client()
            .await
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|e| SecretError::Unavailable {
                name: name.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        out.secret_string()
            .map(str::to_string)
            .ok_or_else(|| SecretError::Unavailable {
                name: name.to_string(),
                message: "secret has no string value".to_string(),
            })
    }

    fn name(&self) -> &'static str {
        "aws-secrets-manager"
    }
}
