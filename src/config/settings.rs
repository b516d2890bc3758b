// src/config/settings.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::guardian::DEFAULT_SEARCH_URL;

pub const ENV_CONFIG_PATH: &str = "STREAMER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/streamer.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Kinesis,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    /// Process environment (plus `.env`).
    Env,
    /// AWS Secrets Manager.
    Aws,
}

fn default_api_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}
fn default_region() -> String {
    "eu-west-2".to_string()
}
fn default_secret_name() -> String {
    "guardian-article-streamer".to_string()
}
fn default_stream_name() -> String {
    "guardian-content".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_secret_name")]
    pub secret_name: String,
    #[serde(default = "default_secret_source")]
    pub secret_source: SecretSource,
    #[serde(default = "default_stream_name")]
    pub stream_name: String,
    #[serde(default = "default_sink")]
    pub sink: SinkKind,
    /// Local Kinesis emulator endpoint, e.g. `http://localhost:4566`.
    #[serde(default)]
    pub kinesis_endpoint: Option<String>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

fn default_secret_source() -> SecretSource {
    SecretSource::Env
}
fn default_sink() -> SinkKind {
    SinkKind::Kinesis
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            region: default_region(),
            secret_name: default_secret_name(),
            secret_source: default_secret_source(),
            stream_name: default_stream_name(),
            sink: default_sink(),
            kinesis_endpoint: None,
            connect_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing settings {}", path.display()))
    }

    /// Settings with precedence env > file > defaults. The file is
    /// $STREAMER_CONFIG_PATH (must exist) or `config/streamer.toml` when present.
    pub fn load() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from(&fallback)?
            } else {
                Self::default()
            }
        };
        base.with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = env_nonempty("GUARDIAN_URL") {
            self.api_url = v;
        }
        if let Some(v) = env_nonempty("AWS_REGION") {
            self.region = v;
        }
        if let Some(v) = env_nonempty("STREAMER_SECRET_NAME") {
            self.secret_name = v;
        }
        if let Some(v) = env_nonempty("STREAMER_SECRET_SOURCE") {
            self.secret_source = match v.to_ascii_lowercase().as_str() {
                "env" => SecretSource::Env,
                "aws" => SecretSource::Aws,
                other => bail!("unsupported STREAMER_SECRET_SOURCE: {other}"),
            };
        }
        if let Some(v) = env_nonempty("STREAM_NAME") {
            self.stream_name = v;
        }
        if let Some(v) = env_nonempty("STREAMER_SINK") {
            self.sink = match v.to_ascii_lowercase().as_str() {
                "kinesis" => SinkKind::Kinesis,
                "console" => SinkKind::Console,
                other => bail!("unsupported STREAMER_SINK: {other}"),
            };
        }
        if let Some(v) = env_nonempty("KINESIS_ENDPOINT_URL") {
            self.kinesis_endpoint = Some(v);
        }
        Ok(self)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
