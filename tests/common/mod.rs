// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use guardian_article_streamer::error::{BrokerError, SecretError};
use guardian_article_streamer::ingest::guardian::GuardianClient;
use guardian_article_streamer::publish::{BatchReceipt, RecordBroker, StreamPublisher};
use guardian_article_streamer::{PublishUnit, SecretCache, SecretStore, Streamer};
use serde_json::{json, Value};

pub const STREAM: &str = "guardian-test-stream";
pub const API_KEY: &str = "test-key";

pub type Calls = Arc<Mutex<Vec<(String, Vec<PublishUnit>)>>>;

/// Broker double: records every batch and answers with a fixed reply.
#[derive(Clone)]
pub struct RecordingBroker {
    pub calls: Calls,
    reply: Reply,
}

#[derive(Clone)]
enum Reply {
    Failed(u32),
    Raise(String),
}

impl RecordingBroker {
    pub fn failing(failed_count: u32) -> Self {
        Self {
            calls: Arc::default(),
            reply: Reply::Failed(failed_count),
        }
    }

    pub fn ok() -> Self {
        Self::failing(0)
    }

    pub fn raising(message: &str) -> Self {
        Self {
            calls: Arc::default(),
            reply: Reply::Raise(message.to_string()),
        }
    }
}

#[async_trait]
impl RecordBroker for RecordingBroker {
    async fn put_records(
        &self,
        stream: &str,
        units: Vec<PublishUnit>,
    ) -> Result<BatchReceipt, BrokerError> {
        self.calls.lock().unwrap().push((stream.to_string(), units));
        match &self.reply {
            Reply::Failed(n) => Ok(BatchReceipt { failed_count: *n }),
            Reply::Raise(m) => Err(BrokerError::Service {
                stream: stream.to_string(),
                message: m.clone(),
            }),
        }
    }
}

/// Secret store double that counts retrievals. Fails while `fail_first` > 0.
#[derive(Clone)]
pub struct CountingStore {
    pub doc: String,
    pub hits: Arc<AtomicUsize>,
    pub fail_first: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new(doc: Value) -> Self {
        Self {
            doc: doc.to_string(),
            hits: Arc::default(),
            fail_first: Arc::default(),
        }
    }

    pub fn failing_once(doc: Value) -> Self {
        let s = Self::new(doc);
        s.fail_first.store(1, Ordering::SeqCst);
        s
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for CountingStore {
    async fn fetch_secret(&self, name: &str) -> Result<String, SecretError> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let pending = self.fail_first.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_first.store(pending - 1, Ordering::SeqCst);
            return Err(SecretError::Unavailable {
                name: name.to_string(),
                message: "store unreachable".to_string(),
            });
        }
        Ok(self.doc.clone())
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

pub fn articles_body(urls: &[&str]) -> Value {
    let results: Vec<Value> = urls
        .iter()
        .enumerate()
        .map(|(i, u)| {
            json!({
                "webUrl": u,
                "webTitle": format!("Article {i}"),
                "webPublicationDate": "2024-01-02T10:00:00Z"
            })
        })
        .collect();
    json!({ "response": { "status": "ok", "total": results.len(), "results": results } })
}

/// Streamer wired to a Guardian mock at `api_url` and the given broker.
pub fn streamer(api_url: &str, broker: RecordingBroker, store: CountingStore) -> Streamer {
    Streamer::new(
        GuardianClient::new(),
        SecretCache::new(Box::new(store), "guardian-test-secret"),
        Box::new(StreamPublisher::new(broker, STREAM)),
        api_url.to_string(),
    )
}

pub fn key_only_secret() -> Value {
    json!({ "GUARDIAN_API_KEY": API_KEY })
}
