//! Runtime configuration.
//!
//! Every knob has a default that reproduces the stock behaviour, so the YAML
//! file passed with `--config` only needs the fields it overrides:
//!
//! ```yaml
//! excluded_domains: [wsj.com, bloomberg.com]
//! body_selectors:
//!   - { kind: id, value: js-article__body }
//!   - { kind: class, value: FeaturedContent-articleBody }
//!   - { kind: class, value: caas-body }
//! timeout_secs: 20
//! concurrency: 4
//! ```
//!
//! API keys never live here; they arrive through [`Credentials`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// How a known article-body container is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    Id,
    Class,
}

/// One entry of the prioritized article-body locator list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySelector {
    pub kind: SelectorKind,
    pub value: String,
}

impl BodySelector {
    pub fn id(value: &str) -> Self {
        Self {
            kind: SelectorKind::Id,
            value: value.to_string(),
        }
    }

    pub fn class(value: &str) -> Self {
        Self {
            kind: SelectorKind::Class,
            value: value.to_string(),
        }
    }
}

/// Upper bound accepted for [`ClassifierConfig::retries`].
pub const MAX_CLASSIFIER_RETRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub url: String,
    /// Value of the `X-RapidAPI-Host` header.
    pub host: String,
    /// Extra attempts after a failed call; 0 keeps the single-shot behaviour.
    pub retries: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            url: "https://comprehend-it.p.rapidapi.com/predictions/ml-zero-nli-model".to_string(),
            host: "comprehend-it.p.rapidapi.com".to_string(),
            retries: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub url: String,
    /// Value of the `X-RapidAPI-Host` header.
    pub host: String,
    /// Language/region passed as the `lr` query parameter.
    pub language: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            url: "https://google-news13.p.rapidapi.com/search".to_string(),
            host: "google-news13.p.rapidapi.com".to_string(),
            language: "en-US".to_string(),
        }
    }
}

/// Top-level configuration, deserialized from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Known article-body containers, tried in order; first match wins.
    pub body_selectors: Vec<BodySelector>,
    /// Domains whose pages defeat the extractor.
    pub excluded_domains: Vec<String>,
    /// Candidate URLs used when live discovery is off.
    pub fallback_urls: Vec<String>,
    /// How many discovered URLs are considered.
    pub max_sources: usize,
    /// Paragraphs must be strictly longer than this many characters.
    pub min_paragraph_chars: usize,
    /// Fewer kept blocks than this marks the scrape as blocked.
    pub min_blocks: usize,
    /// Per-call timeout for every outbound HTTP request.
    pub timeout_secs: u64,
    /// Articles processed at once. Results are still folded in list order.
    pub concurrency: usize,
    pub user_agent: String,
    pub classifier: ClassifierConfig,
    pub discovery: DiscoveryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            body_selectors: vec![
                BodySelector::id("js-article__body"),
                BodySelector::class("FeaturedContent-articleBody"),
            ],
            excluded_domains: vec!["wsj.com".to_string()],
            fallback_urls: [
                "https://www.cnbc.com/2024/04/03/stock-market-today-live-updates.html",
                "https://www.marketwatch.com/livecoverage/stock-market-today-dow-futures-rise-as-bond-yields-steady",
                "https://www.wsj.com/livecoverage/stock-market-today-dow-jones-04-04-2024",
                "https://finance.yahoo.com/news/live/stock-market-today-tech-leads-market-bounce-as-powell-soothes-rate-cut-nerves-133121789.html",
                "https://www.investors.com/market-trend/stock-market-today/dow-jones-sp500-nasdaq-nvidia-nvda-stock-google-googl-meta/",
                "https://www.barrons.com/livecoverage/stock-market-today-040424",
                "https://www.investopedia.com/dow-jones-today-04042024-8624640",
                "https://www.bloomberg.com/news/articles/2024-04-03/stock-market-today-dow-s-p-live-updates",
                "https://markets.businessinsider.com/news/stocks/stock-market-today-weekly-jobless-claims-fed-rate-cut-plan-2024-4",
                "https://www.investors.com/market-trend/stock-market-today/dow-jones-sp500-nasdaq-nvidia-nvda-stock-tesla-tsla/",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_sources: 10,
            min_paragraph_chars: 70,
            min_blocks: 4,
            timeout_secs: 30,
            concurrency: 1,
            user_agent: concat!("news_sentiment/", env!("CARGO_PKG_VERSION")).to_string(),
            classifier: ClassifierConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl Config {
    /// Parse a YAML document; missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration file, if one was given.
    ///
    /// # Arguments
    ///
    /// * `path` - YAML file to read; `None` means use the built-in defaults
    ///
    /// # Returns
    ///
    /// The parsed configuration, with every field the file omits set to its
    /// default, or [`Config::default`] when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid YAML for [`Config`],
    /// or holds out-of-range values (zero `concurrency` or `timeout_secs`,
    /// `classifier.retries` above [`MAX_CLASSIFIER_RETRIES`]).
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let yaml = fs::read_to_string(path).await?;
                let config = Self::from_yaml(&yaml)?;
                info!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            None => {
                info!("No config file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError("concurrency must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError("timeout_secs must be at least 1".to_string()));
        }
        if self.classifier.retries > MAX_CLASSIFIER_RETRIES {
            return Err(ConfigError(format!(
                "classifier.retries must be at most {MAX_CLASSIFIER_RETRIES}, got {}",
                self.classifier.retries
            )));
        }
        Ok(())
    }
}

/// Secrets for the RapidAPI-hosted collaborators.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: Option<String>,
}

impl Credentials {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    /// The key, or an error naming what needed it.
    pub fn require(&self, purpose: &str) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError(format!("an API key is required for {purpose}")))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Invalid or incomplete configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error: {}", self.0)
    }
}

impl Error for ConfigError {}
