// src/publish/console.rs
use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{record_outcome, to_publish_units, PublishOutcome, Publisher};
use crate::ingest::types::ArticleRecord;

/// Echoes each unit as `partition_key<TAB>payload` to a writer instead of a
/// broker. Local development sink.
pub struct ConsolePublisher<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsolePublisher<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsolePublisher<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_units(&self, records: &[ArticleRecord]) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("console writer poisoned"))?;
        for unit in to_publish_units(records) {
            out.write_all(unit.partition_key.as_bytes())?;
            out.write_all(b"\t")?;
            out.write_all(&unit.payload)?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

#[async_trait]
impl<W: Write + Send> Publisher for ConsolePublisher<W> {
    async fn publish(&self, records: &[ArticleRecord]) -> Option<PublishOutcome> {
        if records.is_empty() {
            tracing::info!("no records provided to publish");
            return None;
        }

        let outcome = match self.write_units(records) {
            Ok(()) => PublishOutcome::AllSucceeded,
            Err(e) => {
                tracing::error!(error = %e, "console sink write failed");
                PublishOutcome::TransportFailure
            }
        };
        record_outcome(outcome, records.len());
        Some(outcome)
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
