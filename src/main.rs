//! # News Sentiment
//!
//! Fetches news articles about a topic, extracts their body text, scores
//! each article with a zero-shot sentiment classifier and folds the scores
//! into a single Buy / Hold / Sell assessment.
//!
//! ## Usage
//!
//! ```sh
//! news_sentiment "dow jones"                 # dry run, no API quota used
//! RAPIDAPI_KEY=... news_sentiment --live nvidia
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: live news search, or a fixed fallback list
//! 2. **Filtering**: drop sites known to defeat the extractor
//! 3. **Per article**: fetch, extract, normalize, classify
//! 4. **Aggregation**: sum the distributions and assess net sentiment
//!
//! Diagnostics go to stderr through `tracing`; the assessment is the only
//! thing written to stdout.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod extract;
mod fetch;
mod models;
mod normalize;
mod pipeline;
mod sentiment;
mod sources;
mod utils;

use cli::Cli;
use config::{Config, Credentials};
use fetch::{HttpPageSource, build_http_client};
use pipeline::Pipeline;
use sentiment::{ComprehendClient, RetryClassify};
use sources::GoogleNewsClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_sentiment starting up");

    let args = Cli::parse();
    debug!(topic = %args.topic, live = args.live, config = ?args.config, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref()).await?;
    let credentials = Credentials::new(args.rapidapi_key.clone());
    if args.live {
        if let Err(e) = credentials.require("live mode (set RAPIDAPI_KEY or --rapidapi-key)") {
            error!(error = %e, "Cannot run live without an API key");
            return Err(e.into());
        }
    }

    let http = build_http_client(&config)?;
    let discovery = GoogleNewsClient::new(http.clone(), &config.discovery, credentials.clone());
    let classifier = RetryClassify::new(
        ComprehendClient::new(http.clone(), &config.classifier, credentials),
        config.classifier.retries,
        Duration::from_secs(1),
    );
    let pages = HttpPageSource::new(http);
    let pipeline = Pipeline::new(config, discovery, pages, classifier);

    let report = match pipeline.evaluate(&args.topic, args.live).await {
        Ok(report) => report,
        Err(e) => {
            error!(topic = %args.topic, error = %e, "Topic evaluation failed");
            return Err(e);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
