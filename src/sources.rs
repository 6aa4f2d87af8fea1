//! Source discovery and filtering.
//!
//! Live discovery asks the Google News search API on RapidAPI for articles
//! about a topic. When live mode is off, the pipeline uses the configured
//! fallback list instead so no search quota is spent. Either way, URLs from
//! sites that defeat the extractor are dropped before any page is fetched.

use crate::config::{Credentials, DiscoveryConfig};
use crate::utils::{site_domain, truncate_for_log};
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// A search service returning article URLs, most relevant first.
pub trait NewsDiscovery {
    async fn search(&self, topic: &str) -> Result<Vec<String>, Box<dyn Error>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "newsUrl")]
    news_url: Option<String>,
}

/// Client for the `google-news13` search endpoint.
#[derive(Debug, Clone)]
pub struct GoogleNewsClient {
    http: Client,
    config: DiscoveryConfig,
    credentials: Credentials,
}

impl GoogleNewsClient {
    pub fn new(http: Client, config: &DiscoveryConfig, credentials: Credentials) -> Self {
        Self {
            http,
            config: config.clone(),
            credentials,
        }
    }
}

impl NewsDiscovery for GoogleNewsClient {
    #[instrument(level = "info", skip(self))]
    async fn search(&self, topic: &str) -> Result<Vec<String>, Box<dyn Error>> {
        let key = self.credentials.require("news search")?;
        let url = Url::parse_with_params(
            &self.config.url,
            &[("keyword", topic), ("lr", self.config.language.as_str())],
        )?;

        let t0 = Instant::now();
        let body = self
            .http
            .get(url)
            .header("X-RapidAPI-Key", key)
            .header("X-RapidAPI-Host", &self.config.host)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                response_preview = %truncate_for_log(&body, 300),
                "Search returned an unexpected payload"
            );
            e
        })?;

        let total = parsed.items.len();
        let urls: Vec<String> = parsed
            .items
            .into_iter()
            .filter_map(|item| item.news_url)
            .filter(|u| is_web_url(u))
            .collect();

        info!(
            total,
            usable = urls.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "Search results received"
        );
        Ok(urls)
    }
}

fn is_web_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => {
            debug!(url = %candidate, "Ignoring unparseable search result");
            false
        }
    }
}

/// Drop URLs whose site is on the exclusion list, preserving order.
pub fn filter_excluded(urls: Vec<String>, excluded: &[String]) -> Vec<String> {
    urls.into_iter()
        .filter(|url| {
            let domain = site_domain(url);
            let blocked = excluded.iter().any(|e| e == domain);
            if blocked {
                info!(%url, %domain, "Skipping excluded site");
            }
            !blocked
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excluded() -> Vec<String> {
        vec!["wsj.com".to_string()]
    }

    fn client_for(server_url: String, key: Option<&str>) -> GoogleNewsClient {
        let config = DiscoveryConfig {
            url: format!("{server_url}/search"),
            host: "google-news13.p.rapidapi.com".to_string(),
            language: "en-US".to_string(),
        };
        GoogleNewsClient::new(
            Client::new(),
            &config,
            Credentials::new(key.map(str::to_string)),
        )
    }

    #[test]
    fn test_filter_drops_excluded_site() {
        let urls = vec![
            "https://www.cnbc.com/2024/04/03/a.html".to_string(),
            "https://www.wsj.com/x/y".to_string(),
            "https://finance.yahoo.com/news/b".to_string(),
        ];
        let kept = filter_excluded(urls, &excluded());
        assert_eq!(
            kept,
            vec![
                "https://www.cnbc.com/2024/04/03/a.html".to_string(),
                "https://finance.yahoo.com/news/b".to_string(),
            ]
        );
    }

    #[test]
    fn test_filter_matches_whole_domain_only() {
        // Subdomains and lookalikes are not the excluded site.
        let urls = vec![
            "https://blogs.wsj.com/a".to_string(),
            "https://notwsj.com/a".to_string(),
        ];
        assert_eq!(filter_excluded(urls.clone(), &excluded()), urls);
    }

    #[test]
    fn test_filter_everything_excluded() {
        let urls = vec!["http://www.wsj.com/a".to_string(), "https://wsj.com/b".to_string()];
        assert!(filter_excluded(urls, &excluded()).is_empty());
    }

    #[tokio::test]
    async fn test_search_reads_news_urls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("keyword".into(), "dow jones".into()),
                mockito::Matcher::UrlEncoded("lr".into(), "en-US".into()),
            ]))
            .match_header("x-rapidapi-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status": "success", "items": [
                    {"title": "A", "newsUrl": "https://www.cnbc.com/a"},
                    {"title": "B"},
                    {"title": "C", "newsUrl": "not a url"},
                    {"title": "D", "newsUrl": "ftp://example.com/file"},
                    {"title": "E", "newsUrl": "https://finance.yahoo.com/e"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(server.url(), Some("test-key"));
        let urls = client.search("dow jones").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            urls,
            vec![
                "https://www.cnbc.com/a".to_string(),
                "https://finance.yahoo.com/e".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_http_error_is_err() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(server.url(), Some("test-key"));
        assert!(client.search("dow jones").await.is_err());
    }

    #[tokio::test]
    async fn test_search_requires_key() {
        let client = client_for("http://127.0.0.1:9".to_string(), None);
        assert!(client.search("dow jones").await.is_err());
    }
}
