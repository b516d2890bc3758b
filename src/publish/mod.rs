// src/publish/mod.rs
pub mod console;
pub mod kinesis;

use async_trait::async_trait;
use metrics::counter;

use crate::ingest::types::ArticleRecord;

pub use console::ConsolePublisher;
pub use kinesis::{BatchReceipt, KinesisBroker, RecordBroker, StreamPublisher};

/// Broker-wire form of one article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishUnit {
    pub payload: Vec<u8>,
    pub partition_key: String,
}

impl PublishUnit {
    /// `index` is the record's position within the current publish call.
    pub fn from_record(index: usize, record: &ArticleRecord) -> Self {
        let partition_key = match record.web_url() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("record-{index}"),
        };
        Self {
            payload: record.to_json_bytes(),
            partition_key,
        }
    }
}

/// Order-preserving 1:1 mapping. Duplicate URLs keep identical keys.
pub fn to_publish_units(records: &[ArticleRecord]) -> Vec<PublishUnit> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| PublishUnit::from_record(i, r))
        .collect()
}

/// Result of a submitted batch. "Nothing to publish" is not an outcome: see
/// [`Publisher::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    AllSucceeded,
    PartialFailure { failed_count: u32 },
    TransportFailure,
}

impl PublishOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PublishOutcome::AllSucceeded => "all_succeeded",
            PublishOutcome::PartialFailure { .. } => "partial_failure",
            PublishOutcome::TransportFailure => "transport_failure",
        }
    }
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish every record in one submission. Returns `None` when `records`
    /// is empty; no broker call is made in that case.
    async fn publish(&self, records: &[ArticleRecord]) -> Option<PublishOutcome>;
    fn name(&self) -> &'static str;
}

pub(crate) fn record_outcome(outcome: PublishOutcome, submitted: usize) {
    counter!("streamer_publish_total", "outcome" => outcome.label()).increment(1);
    match outcome {
        PublishOutcome::AllSucceeded => {
            counter!("streamer_records_published_total").increment(submitted as u64);
        }
        PublishOutcome::PartialFailure { failed_count } => {
            let ok = submitted.saturating_sub(failed_count as usize);
            counter!("streamer_records_published_total").increment(ok as u64);
            counter!("streamer_records_failed_total").increment(u64::from(failed_count));
        }
        PublishOutcome::TransportFailure => {
            counter!("streamer_records_failed_total").increment(submitted as u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: serde_json::Value) -> ArticleRecord {
        ArticleRecord::try_from(v).unwrap()
    }

    #[test]
    fn key_is_web_url_or_positional() {
        let records = vec![
            rec(json!({"webUrl": "https://url/1"})),
            rec(json!({"webTitle": "no url"})),
            rec(json!({"webUrl": ""})),
            rec(json!({"webUrl": 42})),
        ];
        let keys: Vec<_> = to_publish_units(&records)
            .into_iter()
            .map(|u| u.partition_key)
            .collect();
        assert_eq!(keys, vec!["https://url/1", "record-1", "record-2", "record-3"]);
    }

    #[test]
    fn duplicate_urls_are_not_disambiguated() {
        let records = vec![
            rec(json!({"webUrl": "https://same", "webTitle": "a"})),
            rec(json!({"webUrl": "https://same", "webTitle": "b"})),
        ];
        let units = to_publish_units(&records);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].partition_key, units[1].partition_key);
        assert_ne!(units[0].payload, units[1].payload);
    }

    #[test]
    fn payload_is_record_json() {
        let r = rec(json!({"webUrl": "https://u", "webTitle": "T"}));
        let unit = PublishUnit::from_record(0, &r);
        let back: serde_json::Value = serde_json::from_slice(&unit.payload).unwrap();
        assert_eq!(back, json!({"webUrl": "https://u", "webTitle": "T"}));
    }
}
