// src/ingest/mod.rs
pub mod guardian;
pub mod normalize;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::criteria::SearchCriteria;
use crate::error::PipelineError;
use crate::ingest::guardian::GuardianClient;
use crate::ingest::types::{ArticleRecord, FetchResult};
use crate::publish::{PublishOutcome, Publisher};
use crate::secrets::SecretCache;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "streamer_fetch_total",
            "Content API calls by classified outcome."
        );
        describe_histogram!("streamer_fetch_ms", "Content API call time in milliseconds.");
        describe_counter!(
            "streamer_records_extracted_total",
            "Article records extracted from successful fetches."
        );
        describe_counter!(
            "streamer_publish_total",
            "Publish calls by outcome."
        );
        describe_counter!(
            "streamer_records_published_total",
            "Records accepted by the sink."
        );
        describe_counter!(
            "streamer_records_failed_total",
            "Records the sink failed to accept."
        );
        describe_counter!(
            "streamer_secret_fetch_total",
            "Secret store retrievals (at most one per process when healthy)."
        );
    });
}

/// Closed set of results of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    NothingToPublish,
    Published {
        records: usize,
        outcome: PublishOutcome,
    },
    Unauthorized,
    HttpError {
        status: u16,
        body: String,
    },
    TransportError {
        message: String,
    },
}

impl PipelineOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::NothingToPublish => "nothing_to_publish",
            PipelineOutcome::Published { outcome, .. } => outcome.label(),
            PipelineOutcome::Unauthorized => "unauthorized",
            PipelineOutcome::HttpError { .. } => "http_error",
            PipelineOutcome::TransportError { .. } => "fetch_transport_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            PipelineOutcome::NothingToPublish
                | PipelineOutcome::Published {
                    outcome: PublishOutcome::AllSucceeded,
                    ..
                }
        )
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineOutcome::NothingToPublish => 0,
            PipelineOutcome::Published { outcome, .. } => match outcome {
                PublishOutcome::AllSucceeded => 0,
                PublishOutcome::PartialFailure { .. } => 2,
                PublishOutcome::TransportFailure => 3,
            },
            PipelineOutcome::Unauthorized => 4,
            PipelineOutcome::HttpError { .. } => 5,
            PipelineOutcome::TransportError { .. } => 6,
        }
    }

    /// Status code for the invocation response.
    pub fn http_status(&self) -> u16 {
        match self {
            PipelineOutcome::NothingToPublish => 200,
            PipelineOutcome::Published { outcome, .. } => match outcome {
                PublishOutcome::AllSucceeded => 200,
                PublishOutcome::PartialFailure { .. } => 207,
                PublishOutcome::TransportFailure => 502,
            },
            PipelineOutcome::Unauthorized => 401,
            PipelineOutcome::HttpError { .. } | PipelineOutcome::TransportError { .. } => 502,
        }
    }
}

/// Fetch-transform-publish pipeline. Owns the credential cache, so reusing one
/// `Streamer` across runs reuses the credentials.
pub struct Streamer {
    fetcher: GuardianClient,
    secrets: SecretCache,
    publisher: Box<dyn Publisher>,
    default_api_url: String,
}

impl Streamer {
    pub fn new(
        fetcher: GuardianClient,
        secrets: SecretCache,
        publisher: Box<dyn Publisher>,
        default_api_url: impl Into<String>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            fetcher,
            secrets,
            publisher,
            default_api_url: default_api_url.into(),
        }
    }

    /// Query the content API and return the extracted records without
    /// publishing. Non-success fetches are returned as-is.
    pub async fn fetch_articles(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<(FetchResult, Vec<ArticleRecord>), PipelineError> {
        let params = crate::criteria::build(criteria);
        let creds = self.secrets.get_credentials().await?;
        let api_url = creds.api_url().unwrap_or(self.default_api_url.as_str());

        let result = self.fetcher.fetch(api_url, &params, creds.api_key()).await?;
        let records = normalize::extract(&result);
        counter!("streamer_records_extracted_total").increment(records.len() as u64);
        Ok((result, records))
    }

    pub async fn run(&self, criteria: &SearchCriteria) -> Result<PipelineOutcome, PipelineError> {
        tracing::info!(
            search_term = criteria.search_term(),
            date_from = %criteria.date_from(),
            sink = self.publisher.name(),
            "pipeline run"
        );

        let (result, records) = self.fetch_articles(criteria).await?;
        let outcome = match result {
            FetchResult::Unauthorized => PipelineOutcome::Unauthorized,
            FetchResult::HttpError { status, body } => PipelineOutcome::HttpError { status, body },
            FetchResult::TransportError { message } => PipelineOutcome::TransportError { message },
            FetchResult::Success(_) => match self.publisher.publish(&records).await {
                None => PipelineOutcome::NothingToPublish,
                Some(outcome) => PipelineOutcome::Published {
                    records: records.len(),
                    outcome,
                },
            },
        };

        tracing::info!(outcome = outcome.label(), "pipeline finished");
        Ok(outcome)
    }
}
