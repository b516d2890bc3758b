// src/ingest/normalize.rs
use std::fmt::Write as _;

use serde_json::Value;

use crate::ingest::types::{ArticleRecord, FetchResult};

/// Pull `response.results` out of a successful fetch. Every other case,
/// including a payload without that path, yields an empty list.
pub fn extract(result: &FetchResult) -> Vec<ArticleRecord> {
    let FetchResult::Success(payload) = result else {
        return Vec::new();
    };

    let Some(items) = payload
        .get("response")
        .and_then(|r| r.get("results"))
        .and_then(Value::as_array)
    else {
        tracing::debug!("payload has no response.results array");
        return Vec::new();
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match ArticleRecord::try_from(item.clone()) {
            Ok(rec) => out.push(rec),
            Err(_) => tracing::warn!(index = i, "skipping non-object result item"),
        }
    }
    out
}

/// Human-readable listing of publication date, title and URL per article.
pub fn render_summary(records: &[ArticleRecord]) -> String {
    if records.is_empty() {
        return "No articles found to display.\n".to_string();
    }

    let mut out = String::from("--- Extracted Article Data ---\n");
    for (i, rec) in records.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "\nArticle {}:\n  webPublicationDate: {}\n  webTitle: {}\n  webUrl: {}\n",
            i + 1,
            rec.web_publication_date().unwrap_or("N/A"),
            rec.web_title().unwrap_or("N/A"),
            rec.web_url().unwrap_or("N/A"),
        );
    }
    out.push_str("------------------------------\n");
    out
}
