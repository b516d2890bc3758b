// src/ingest/guardian.rs
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use reqwest::StatusCode;

use crate::criteria::QueryParameters;
use crate::error::FetchError;
use crate::ingest::types::FetchResult;

pub const DEFAULT_SEARCH_URL: &str = "https://content.guardianapis.com/search";
const API_KEY_PARAM: &str = "api-key";

/// Content API client. One GET per `fetch`, no retries.
#[derive(Clone)]
pub struct GuardianClient {
    http: reqwest::Client,
}

fn http_client(connect_timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("guardian-article-streamer/", env!("CARGO_PKG_VERSION")));
    if let Some(t) = connect_timeout {
        builder = builder.connect_timeout(t);
    }
    builder.build().unwrap_or_default()
}

impl Default for GuardianClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardianClient {
    pub fn new() -> Self {
        Self::with_http(http_client(None))
    }

    /// Client with a connect timeout. Request timeouts stay at the transport default.
    pub fn with_connect_timeout(secs: u64) -> Self {
        Self::with_http(http_client(Some(Duration::from_secs(secs))))
    }

    pub fn with_http(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn fetch(
        &self,
        api_url: &str,
        params: &QueryParameters,
        api_key: &str,
    ) -> Result<FetchResult, FetchError> {
        let query = params.merged_with(API_KEY_PARAM, api_key);
        let t0 = Instant::now();

        let result = match self.http.get(api_url).query(&query).send().await {
            Ok(resp) => classify(resp).await?,
            Err(e) => {
                tracing::warn!(error = %e, url = api_url, "content API unreachable");
                FetchResult::TransportError {
                    message: e.to_string(),
                }
            }
        };

        histogram!("streamer_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("streamer_fetch_total", "outcome" => result.outcome_label()).increment(1);
        Ok(result)
    }
}

async fn classify(resp: reqwest::Response) -> Result<FetchResult, FetchError> {
    let status = resp.status();
    let body = match resp.text().await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(status = status.as_u16(), error = %e, "failed reading response body");
            return Ok(FetchResult::TransportError {
                message: e.to_string(),
            });
        }
    };

    match status {
        StatusCode::OK => {
            tracing::info!(status = status.as_u16(), "content API responded");
            let payload = serde_json::from_str(&body).map_err(FetchError::MalformedBody)?;
            Ok(FetchResult::Success(payload))
        }
        StatusCode::UNAUTHORIZED => {
            tracing::error!(
                status = status.as_u16(),
                "unauthorized: check the API key held in the secret store"
            );
            Ok(FetchResult::Unauthorized)
        }
        other => {
            tracing::error!(status = other.as_u16(), body = %body, "content API error");
            Ok(FetchResult::HttpError {
                status: other.as_u16(),
                body,
            })
        }
    }
}
