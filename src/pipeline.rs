//! Topic evaluation pipeline.
//!
//! ```text
//! discover -> filter -> for each URL: fetch -> extract -> normalize -> classify
//!          -> fold totals -> recommendation
//! ```
//!
//! Per-article trouble (fetch errors, blocked scrapes, classifier failures)
//! never aborts the run; the article just contributes a zero distribution.
//! Only discovery can fail the evaluation, since without candidate URLs
//! there is nothing to assess.
//!
//! Articles are processed `concurrency` at a time (1 by default). Results are
//! kept in discovery order and folded serially, so the totals do not depend
//! on how many articles were in flight.

use crate::aggregate::{assess_distribution, update};
use crate::config::Config;
use crate::extract::extract_from_markup;
use crate::fetch::PageSource;
use crate::models::{ArticleReport, ArticleStatus, Recommendation, SentimentDistribution, TopicReport};
use crate::normalize::normalize;
use crate::sentiment::{SentimentAdapter, SentimentClassifier};
use crate::sources::{NewsDiscovery, filter_excluded};
use crate::utils::truncate_for_log;
use chrono::Local;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Wires the collaborators together for one or more topic evaluations.
#[derive(Debug)]
pub struct Pipeline<D, P, C> {
    config: Config,
    discovery: D,
    pages: P,
    sentiment: SentimentAdapter<C>,
}

impl<D, P, C> Pipeline<D, P, C>
where
    D: NewsDiscovery,
    P: PageSource,
    C: SentimentClassifier,
{
    pub fn new(config: Config, discovery: D, pages: P, classifier: C) -> Self {
        Self {
            config,
            discovery,
            pages,
            sentiment: SentimentAdapter::new(classifier),
        }
    }

    /// Evaluate `topic` and return the full report.
    ///
    /// # Arguments
    ///
    /// * `topic` - Search keyword passed to live discovery
    /// * `use_live` - Use live search and live classification; otherwise the
    ///   fallback URL list and the canned distribution are used
    ///
    /// # Returns
    ///
    /// One [`ArticleReport`] per non-excluded candidate URL in discovery
    /// order, the summed totals and the resulting recommendation.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when live discovery fails or finds nothing.
    /// Per-article failures are recorded in the report instead.
    #[instrument(level = "info", skip(self))]
    pub async fn evaluate(&self, topic: &str, use_live: bool) -> Result<TopicReport, Box<dyn Error>> {
        let t0 = Instant::now();

        let urls = self.discover(topic, use_live).await?;
        let urls = filter_excluded(urls, &self.config.excluded_domains);
        info!(count = urls.len(), "Evaluating articles");
        debug!(?urls, "Filtered URLs");

        let articles: Vec<ArticleReport> = stream::iter(urls.into_iter().enumerate())
            .map(|(index, url)| async move { self.process_article(index, url, use_live).await })
            .buffered(self.config.concurrency)
            .collect()
            .await;

        let totals = tally(&articles);
        let recommendation = assess_distribution(&totals);

        let classified = articles
            .iter()
            .filter(|a| a.status == ArticleStatus::Classified)
            .count();
        info!(
            articles = articles.len(),
            classified,
            positive = totals.positive,
            negative = totals.negative,
            neutral = totals.neutral,
            %recommendation,
            elapsed_ms = t0.elapsed().as_millis(),
            "Topic evaluation complete"
        );

        Ok(TopicReport {
            topic: topic.to_string(),
            evaluated_at: Local::now().to_rfc3339(),
            live: use_live,
            articles,
            totals,
            recommendation,
        })
    }

    /// Candidate URLs, capped at `max_sources`.
    async fn discover(&self, topic: &str, use_live: bool) -> Result<Vec<String>, Box<dyn Error>> {
        let urls = if use_live {
            let found = self.discovery.search(topic).await.map_err(|e| {
                error!(error = %e, "News discovery failed");
                e
            })?;
            if found.is_empty() {
                error!("News discovery returned no usable URLs");
                return Err(format!("no articles found for topic {topic:?}").into());
            }
            found
        } else {
            debug!("Live discovery disabled; using fallback URLs");
            self.config.fallback_urls.clone()
        };

        let urls: Vec<String> = urls.into_iter().take(self.config.max_sources).collect();
        info!(count = urls.len(), live = use_live, "Discovered candidate URLs");
        Ok(urls)
    }

    #[instrument(level = "info", skip(self, use_live))]
    async fn process_article(&self, index: usize, url: String, use_live: bool) -> ArticleReport {
        let markup = match self.pages.fetch(&url).await {
            Ok(markup) => markup,
            Err(e) => {
                warn!(error = %e, "Page fetch failed; article contributes no signal");
                return ArticleReport {
                    url,
                    status: ArticleStatus::FetchFailed,
                    kept: 0,
                    dropped: 0,
                    distribution: SentimentDistribution::ZERO,
                    recommendation: Recommendation::Hold,
                };
            }
        };

        let extracted = extract_from_markup(
            &markup,
            &self.config.body_selectors,
            self.config.min_paragraph_chars,
        );
        let kept = extracted.kept();
        info!(kept, dropped = extracted.dropped, "Extracted paragraphs");

        if kept < self.config.min_blocks {
            warn!(kept, "Too little text extracted; source is likely using bot protection");
            return ArticleReport {
                url,
                status: ArticleStatus::Blocked,
                kept,
                dropped: extracted.dropped,
                distribution: SentimentDistribution::ZERO,
                recommendation: Recommendation::Hold,
            };
        }

        let text = extracted.blocks().map(normalize).join("\n");
        debug!(chars = text.len(), text = %truncate_for_log(&text, 500), "Normalized article text");

        let distribution = self.sentiment.classify(&text, use_live).await;
        ArticleReport {
            url,
            status: ArticleStatus::Classified,
            kept,
            dropped: extracted.dropped,
            distribution,
            recommendation: assess_distribution(&distribution),
        }
    }
}

/// Fold article distributions in order, logging the running assessment.
fn tally(articles: &[ArticleReport]) -> SentimentDistribution {
    articles
        .iter()
        .fold(SentimentDistribution::ZERO, |totals, article| {
            let totals = update(totals, &article.distribution);
            info!(
                url = %article.url,
                article = %article.recommendation,
                so_far = %assess_distribution(&totals),
                "Stock assessment"
            );
            totals
        })
}
