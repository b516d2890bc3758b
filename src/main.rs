//! Guardian Article Streamer — binary entrypoint.
//! `publish` runs the pipeline once, `preview` prints what would be published,
//! `serve` exposes the invocation shim over HTTP.

use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use guardian_article_streamer::api::{self, AppState};
use guardian_article_streamer::bootstrap;
use guardian_article_streamer::config::{Settings, SinkKind};
use guardian_article_streamer::criteria::SearchCriteria;
use guardian_article_streamer::ingest::normalize::render_summary;
use guardian_article_streamer::ingest::types::FetchResult;
use guardian_article_streamer::metrics::Metrics;
use guardian_article_streamer::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "guardian-streamer",
    version,
    about = "Retrieve the most recent Guardian articles and stream them to Kinesis"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch articles and publish them to the configured sink.
    Publish {
        search_term: String,
        /// YYYY-MM-DD; defaults to today (UTC).
        #[arg(long)]
        date_from: Option<String>,
        #[arg(long, value_enum)]
        sink: Option<SinkKind>,
    },
    /// Fetch articles and print date, title and URL without publishing.
    Preview {
        search_term: String,
        #[arg(long)]
        date_from: Option<String>,
    },
    /// Serve `POST /invoke`, `/health` and `/metrics`.
    Serve {
        #[arg(long, default_value = "0.0.0.0:3000")]
        bind: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    telemetry::init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "guardian-streamer failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load().context("loading settings")?;
    let today = chrono::Utc::now().date_naive();

    match cli.command {
        Command::Publish {
            search_term,
            date_from,
            sink,
        } => {
            let criteria = SearchCriteria::from_raw(&search_term, date_from.as_deref(), today)?;
            let streamer = bootstrap::streamer_from_settings(&settings, sink).await;
            let outcome = streamer.run(&criteria).await?;
            println!("{}", outcome.label());
            Ok(exit_code(outcome.exit_code()))
        }
        Command::Preview {
            search_term,
            date_from,
        } => {
            let criteria = SearchCriteria::from_raw(&search_term, date_from.as_deref(), today)?;
            let streamer =
                bootstrap::streamer_from_settings(&settings, Some(SinkKind::Console)).await;
            let (result, records) = streamer.fetch_articles(&criteria).await?;
            print!("{}", render_summary(&records));
            Ok(match result {
                FetchResult::Success(_) => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Command::Serve { bind } => {
            let metrics = Metrics::install()?;
            let streamer = bootstrap::streamer_from_settings(&settings, None).await;
            let state = AppState::new(streamer).with_metrics(metrics.handle);
            let listener = tokio::net::TcpListener::bind(bind)
                .await
                .with_context(|| format!("binding {bind}"))?;
            tracing::info!(%bind, "serving invocation endpoint");
            axum::serve(listener, api::router(state))
                .await
                .context("http server")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
