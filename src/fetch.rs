//! Page source providers.
//!
//! The pipeline only needs the rendered markup of a URL. A plain HTTP GET is
//! provided here; a browser-rendering provider would implement the same
//! trait.

use crate::config::Config;
use reqwest::Client;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Anything that can turn a URL into page markup.
pub trait PageSource {
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Shared HTTP client with the configured timeout and user agent.
pub fn build_http_client(config: &Config) -> Result<Client, Box<dyn Error>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Fetches pages with a single GET; non-2xx responses are errors.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    http: Client,
}

impl HttpPageSource {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

impl PageSource for HttpPageSource {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Fetched page source"
        );
        Ok(body)
    }
}
