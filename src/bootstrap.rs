// src/bootstrap.rs
use crate::config::{SecretSource, Settings, SinkKind};
use crate::ingest::guardian::GuardianClient;
use crate::ingest::Streamer;
use crate::publish::{ConsolePublisher, KinesisBroker, Publisher, StreamPublisher};
use crate::secrets::{AwsSecretsStore, EnvSecretStore, SecretCache, SecretStore};
use tracing::info;

pub fn build_secret_store(settings: &Settings) -> Box<dyn SecretStore> {
    match settings.secret_source {
        SecretSource::Env => Box::new(EnvSecretStore::default()),
        SecretSource::Aws => Box::new(AwsSecretsStore::new(settings.region.clone())),
    }
}

pub async fn build_publisher(settings: &Settings, sink: SinkKind) -> Box<dyn Publisher> {
    match sink {
        SinkKind::Console => Box::new(ConsolePublisher::stdout()),
        SinkKind::Kinesis => {
            let broker =
                KinesisBroker::from_region(&settings.region, settings.kinesis_endpoint.as_deref())
                    .await;
            Box::new(StreamPublisher::new(broker, settings.stream_name.clone()))
        }
    }
}

/// Wire a [`Streamer`] from settings. `sink_override` wins over `settings.sink`.
/// No credentials are fetched here; the cache fills on the first run.
pub async fn streamer_from_settings(
    settings: &Settings,
    sink_override: Option<SinkKind>,
) -> Streamer {
    let sink = sink_override.unwrap_or(settings.sink);
    // Safe diagnostics only: no credential values.
    info!(
        secret_source = ?settings.secret_source,
        secret_name = %settings.secret_name,
        sink = ?sink,
        stream = %settings.stream_name,
        region = %settings.region,
        "streamer configured"
    );

    let fetcher = match settings.connect_timeout_secs {
        Some(secs) => GuardianClient::with_connect_timeout(secs),
        None => GuardianClient::new(),
    };
    let secrets = SecretCache::new(build_secret_store(settings), settings.secret_name.clone());
    let publisher = build_publisher(settings, sink).await;
    Streamer::new(fetcher, secrets, publisher, settings.api_url.clone())
}
