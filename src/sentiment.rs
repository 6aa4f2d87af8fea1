//! Sentiment classification with graceful fallback.
//!
//! The classifier is a zero-shot NLI model hosted on RapidAPI
//! (`comprehend-it`). It receives the normalized article text plus the label
//! set `{positive, negative, neutral}` and answers with one probability per
//! label.
//!
//! # Architecture
//!
//! - [`SentimentClassifier`]: the seam the pipeline calls through
//! - [`ComprehendClient`]: the live HTTP implementation
//! - [`RetryClassify`]: decorator adding exponential backoff to any classifier
//! - [`SentimentAdapter`]: never fails; picks the canned fixture for dry runs
//!   and turns every error into the all-zero "no signal" distribution

use crate::config::{ClassifierConfig, Credentials};
use crate::models::SentimentDistribution;
use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Labels the classifier is asked to score.
pub const LABELS: [&str; 3] = ["positive", "negative", "neutral"];

/// Something that can score text.
pub trait SentimentClassifier {
    /// Score `text` against [`LABELS`].
    async fn classify(&self, text: &str) -> Result<SentimentDistribution, Box<dyn Error>>;
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    labels: [&'a str; 3],
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    outputs: SentimentDistribution,
    #[serde(default)]
    truncated: bool,
}

/// Live client for the `comprehend-it` zero-shot endpoint.
#[derive(Debug, Clone)]
pub struct ComprehendClient {
    http: Client,
    url: String,
    host: String,
    credentials: Credentials,
}

impl ComprehendClient {
    pub fn new(http: Client, config: &ClassifierConfig, credentials: Credentials) -> Self {
        Self {
            http,
            url: config.url.clone(),
            host: config.host.clone(),
            credentials,
        }
    }
}

impl SentimentClassifier for ComprehendClient {
    #[instrument(level = "info", skip_all, fields(chars = text.len()))]
    async fn classify(&self, text: &str) -> Result<SentimentDistribution, Box<dyn Error>> {
        let key = self.credentials.require("sentiment classification")?;
        let payload = serde_json::to_string(&ClassifyRequest {
            labels: LABELS,
            text,
        })?;

        let t0 = Instant::now();
        let body = self
            .http
            .post(&self.url)
            .header("content-type", "application/json")
            .header("X-RapidAPI-Key", key)
            .header("X-RapidAPI-Host", &self.host)
            .body(payload)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let dt = t0.elapsed();

        let parsed: ClassifyResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                response_preview = %truncate_for_log(&body, 300),
                "Classifier returned an unexpected payload"
            );
            e
        })?;
        if parsed.truncated {
            warn!("Classifier truncated the submitted text");
        }
        debug!(
            elapsed_ms = dt.as_millis(),
            outputs = ?parsed.outputs,
            "Classifier responded"
        );
        Ok(parsed.outputs)
    }
}

/// Adds exponential backoff retries to any [`SentimentClassifier`].
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryClassify<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryClassify<T>
where
    T: SentimentClassifier,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Backoff before retry number `attempt` (1-based), without jitter.
    fn backoff(&self, attempt: usize) -> StdDuration {
        let exp = attempt.saturating_sub(1).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryClassify<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryClassify")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> SentimentClassifier for RetryClassify<T>
where
    T: SentimentClassifier,
{
    #[instrument(level = "info", skip_all)]
    async fn classify(&self, text: &str) -> Result<SentimentDistribution, Box<dyn Error>> {
        let mut attempt = 0usize;

        loop {
            match self.inner.classify(text).await {
                Ok(d) => return Ok(d),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(attempt, max = self.max_retries, error = %e, "classify() exhausted retries");
                        }
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "classify() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Front door used by the pipeline; always yields a distribution.
#[derive(Debug)]
pub struct SentimentAdapter<C> {
    client: C,
}

impl<C> SentimentAdapter<C>
where
    C: SentimentClassifier,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Score `text`.
    ///
    /// # Arguments
    ///
    /// * `text` - Normalized article text
    /// * `use_live` - Call the wrapped classifier; otherwise return the canned
    ///   fixture without any network call
    ///
    /// # Returns
    ///
    /// The classifier's distribution, [`SentimentDistribution::CANNED`] when
    /// `use_live` is false, or [`SentimentDistribution::ZERO`] when the live
    /// call fails for any reason. Never errors.
    #[instrument(level = "info", skip_all, fields(use_live = use_live))]
    pub async fn classify(&self, text: &str, use_live: bool) -> SentimentDistribution {
        if !use_live {
            debug!("Live classification disabled; using canned distribution");
            return SentimentDistribution::CANNED;
        }

        match self.client.classify(text).await {
            Ok(d) => {
                info!(
                    positive = d.positive,
                    negative = d.negative,
                    neutral = d.neutral,
                    "Classified article"
                );
                d
            }
            Err(e) => {
                warn!(error = %e, "Sentiment classification failed; returning zero distribution");
                SentimentDistribution::ZERO
            }
        }
    }
}
