// src/ingest/types.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One article as returned by the content API. Schema-opaque apart from the
/// handful of fields read downstream; everything else is passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleRecord(Map<String, Value>);

impl ArticleRecord {
    pub fn web_url(&self) -> Option<&str> {
        self.str_field("webUrl")
    }

    pub fn web_title(&self) -> Option<&str> {
        self.str_field("webTitle")
    }

    pub fn web_publication_date(&self) -> Option<&str> {
        self.str_field("webPublicationDate")
    }

    /// Compact JSON encoding of the full record.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        Value::Object(self.0.clone()).to_string().into_bytes()
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for ArticleRecord {
    type Error = Value;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v {
            Value::Object(m) => Ok(Self(m)),
            other => Err(other),
        }
    }
}

/// Classified response of one content API call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Success(Value),
    Unauthorized,
    HttpError { status: u16, body: String },
    TransportError { message: String },
}

impl FetchResult {
    pub fn outcome_label(&self) -> &'static str {
        match self {
            FetchResult::Success(_) => "success",
            FetchResult::Unauthorized => "unauthorized",
            FetchResult::HttpError { .. } => "http_error",
            FetchResult::TransportError { .. } => "transport_error",
        }
    }
}
