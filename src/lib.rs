// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod criteria;
pub mod error;
pub mod handler;
pub mod ingest;
pub mod metrics;
pub mod publish;
pub mod secrets;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::criteria::{build, QueryParameters, SearchCriteria};
pub use crate::ingest::types::{ArticleRecord, FetchResult};
pub use crate::ingest::{PipelineOutcome, Streamer};
pub use crate::publish::{PublishOutcome, PublishUnit, Publisher};
pub use crate::secrets::{CachedSecrets, SecretCache, SecretStore};
