//! Invocation event shim: `{search, date_from?}` in, status + JSON body out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::criteria::SearchCriteria;
use crate::error::PipelineError;
use crate::ingest::{PipelineOutcome, Streamer};
use crate::publish::PublishOutcome;

#[derive(Debug, Clone, Deserialize)]
pub struct InvocationEvent {
    pub search: String,
    #[serde(default)]
    pub date_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    pub status_code: u16,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InvocationResponse {
    fn error(status_code: u16, outcome: &str, message: String) -> Self {
        Self {
            status_code,
            outcome: outcome.to_string(),
            records: None,
            failed_count: None,
            message: Some(message),
        }
    }
}

impl From<&PipelineOutcome> for InvocationResponse {
    fn from(o: &PipelineOutcome) -> Self {
        let (records, failed_count, message) = match o {
            PipelineOutcome::NothingToPublish => (Some(0), None, None),
            PipelineOutcome::Published { records, outcome } => {
                let failed = match outcome {
                    PublishOutcome::PartialFailure { failed_count } => Some(*failed_count),
                    _ => None,
                };
                (Some(*records), failed, None)
            }
            PipelineOutcome::Unauthorized => {
                (None, None, Some("content API rejected the key".to_string()))
            }
            PipelineOutcome::HttpError { status, body } => {
                (None, None, Some(format!("content API returned {status}: {body}")))
            }
            PipelineOutcome::TransportError { message } => (None, None, Some(message.clone())),
        };
        Self {
            status_code: o.http_status(),
            outcome: o.label().to_string(),
            records,
            failed_count,
            message,
        }
    }
}

/// Validate the event, run the pipeline once and map the result.
pub async fn handle_event(
    streamer: &Streamer,
    event: InvocationEvent,
    today: NaiveDate,
) -> InvocationResponse {
    let criteria = match SearchCriteria::from_raw(&event.search, event.date_from.as_deref(), today)
    {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "rejected invocation event");
            return InvocationResponse::error(400, "invalid_request", e.to_string());
        }
    };

    match streamer.run(&criteria).await {
        Ok(outcome) => InvocationResponse::from(&outcome),
        Err(e @ PipelineError::Secrets(_)) => {
            tracing::error!(error = %e, "credentials unavailable");
            InvocationResponse::error(500, "secret_unavailable", e.to_string())
        }
        Err(e @ PipelineError::Fetch(_)) => {
            tracing::error!(error = %e, "content API body unusable");
            InvocationResponse::error(500, "malformed_response", e.to_string())
        }
    }
}
