// src/publish/kinesis.rs
use async_trait::async_trait;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::PutRecordsRequestEntry;
use aws_sdk_kinesis::Client;

use super::{record_outcome, to_publish_units, PublishOutcome, PublishUnit, Publisher};
use crate::error::BrokerError;
use crate::ingest::types::ArticleRecord;

/// Kinesis accepts at most this many records per PutRecords call.
pub const MAX_RECORDS_PER_CALL: usize = 500;

/// Kinesis rejects partition keys longer than this many characters.
pub const MAX_PARTITION_KEY_LEN: usize = 256;

/// What the broker reports back for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReceipt {
    pub failed_count: u32,
}

/// One batch submission against a named stream.
#[async_trait]
pub trait RecordBroker: Send + Sync {
    async fn put_records(
        &self,
        stream: &str,
        units: Vec<PublishUnit>,
    ) -> Result<BatchReceipt, BrokerError>;
}

/// Live Kinesis broker.
pub struct KinesisBroker {
    client: Client,
}

impl KinesisBroker {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build from the default credential chain. `endpoint_url` points the
    /// client at a local Kinesis emulator.
    pub async fn from_region(region: &str, endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()));
        if let Some(url) = endpoint_url {
            tracing::debug!(endpoint = url, "using custom kinesis endpoint");
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl RecordBroker for KinesisBroker {
    async fn put_records(
        &self,
        stream: &str,
        units: Vec<PublishUnit>,
    ) -> Result<BatchReceipt, BrokerError> {
        let mut entries = Vec::with_capacity(units.len());
        for (index, unit) in units.into_iter().enumerate() {
            let entry = PutRecordsRequestEntry::builder()
                .data(Blob::new(unit.payload))
                .partition_key(unit.partition_key)
                .build()
                .map_err(|e| BrokerError::InvalidRecord {
                    index,
                    message: e.to_string(),
                })?;
            entries.push(entry);
        }

        let out = self
            .client
            .put_records()
            .stream_name(stream)
            .set_records(Some(entries))
            .send()
            .await
            .map_err(|e| BrokerError::Service {
                stream: stream.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let failed = out.failed_record_count().unwrap_or(0).max(0);
        Ok(BatchReceipt {
            failed_count: u32::try_from(failed).unwrap_or(0),
        })
    }
}

/// Units whose partition key the broker will refuse. Keys are never
/// truncated here: a shortened URL could collide with another article's key.
fn oversized_keys(units: &[PublishUnit]) -> usize {
    units
        .iter()
        .filter(|u| u.partition_key.chars().count() > MAX_PARTITION_KEY_LEN)
        .count()
}

/// Publishes to a named stream through a [`RecordBroker`].
pub struct StreamPublisher<B: RecordBroker> {
    broker: B,
    stream_name: String,
}

impl<B: RecordBroker> StreamPublisher<B> {
    pub fn new(broker: B, stream_name: impl Into<String>) -> Self {
        Self {
            broker,
            stream_name: stream_name.into(),
        }
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }
}

#[async_trait]
impl<B: RecordBroker> Publisher for StreamPublisher<B> {
    async fn publish(&self, records: &[ArticleRecord]) -> Option<PublishOutcome> {
        if records.is_empty() {
            tracing::info!(stream = %self.stream_name, "no records provided to publish");
            return None;
        }

        let units = to_publish_units(records);
        let submitted = units.len();
        if submitted > MAX_RECORDS_PER_CALL {
            tracing::warn!(
                records = submitted,
                limit = MAX_RECORDS_PER_CALL,
                "batch exceeds the per-call record limit; broker may reject it"
            );
        }
        let long_keys = oversized_keys(&units);
        if long_keys > 0 {
            tracing::warn!(
                records = long_keys,
                limit = MAX_PARTITION_KEY_LEN,
                "partition keys exceed the broker limit; broker may reject the batch"
            );
        }
        tracing::info!(
            records = submitted,
            stream = %self.stream_name,
            "publishing records"
        );

        let outcome = match self.broker.put_records(&self.stream_name, units).await {
            Ok(BatchReceipt { failed_count: 0 }) => {
                tracing::info!(records = submitted, "all records published");
                PublishOutcome::AllSucceeded
            }
            Ok(BatchReceipt { failed_count }) => {
                tracing::warn!(failed_count, records = submitted, "records failed to publish");
                PublishOutcome::PartialFailure { failed_count }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    stream = %self.stream_name,
                    "publishing to stream failed"
                );
                PublishOutcome::TransportFailure
            }
        };

        record_outcome(outcome, submitted);
        Some(outcome)
    }

    fn name(&self) -> &'static str {
        "kinesis"
    }
}
