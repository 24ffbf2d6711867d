//! Agriculture news client.
//!
//! Proxies the hosted news aggregation API and caches pages in-process so
//! repeated dashboard loads don't burn through the provider quota.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::NewsConfig;

/// How long a fetched page stays valid.
const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Maximum number of distinct (query, page) entries kept.
const CACHE_CAPACITY: u64 = 256;

/// Query used when the client does not supply one.
pub const DEFAULT_QUERY: &str = "agriculture";

/// Errors that can occur when fetching news.
#[derive(Debug, Error, Clone)]
pub enum NewsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be constructed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// One mapped news article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub source: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
}

/// One mapped page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPage {
    pub articles: Vec<Article>,
    pub total_results: u64,
}

// Provider response shape (newsapi.org `everything` endpoint).

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(rename = "totalResults", default)]
    total_results: u64,
    #[serde(default)]
    articles: Vec<ProviderArticle>,
}

#[derive(Debug, Deserialize)]
struct ProviderArticle {
    source: Option<ProviderSource>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderSource {
    name: Option<String>,
}

/// News client with an in-process page cache.
#[derive(Clone)]
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<(String, u32), Arc<NewsPage>>,
}

impl NewsClient {
    /// Create a new news client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &NewsConfig) -> Result<Self, NewsError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "X-Api-Key",
            HeaderValue::from_str(config.api_key.expose_secret())
                .map_err(|e| NewsError::Config(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            cache,
        })
    }

    /// Fetch one page of news, serving from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    pub async fn fetch(&self, query: &str, page: u32) -> Result<Arc<NewsPage>, NewsError> {
        let query = if query.trim().is_empty() {
            DEFAULT_QUERY.to_owned()
        } else {
            query.trim().to_owned()
        };
        let page = page.max(1);

        let key = (query.clone(), page);
        self.cache
            .try_get_with(key, self.fetch_uncached(query, page))
            .await
            .map_err(|e: Arc<NewsError>| (*e).clone())
    }

    async fn fetch_uncached(&self, query: String, page: u32) -> Result<Arc<NewsPage>, NewsError> {
        let url = format!(
            "{}/everything?q={}&page={page}&sortBy=publishedAt",
            self.base_url,
            urlencoding::encode(&query)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NewsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let provider: ProviderResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Parse(e.to_string()))?;

        Ok(Arc::new(map_page(provider)))
    }
}

/// Map the provider page, dropping articles without a title or URL.
fn map_page(provider: ProviderResponse) -> NewsPage {
    let articles = provider
        .articles
        .into_iter()
        .filter_map(|a| {
            let title = a.title?;
            let url = a.url?;
            Some(Article {
                title,
                description: a.description,
                url,
                source: a.source.and_then(|s| s.name),
                image_url: a.url_to_image,
                published_at: a.published_at,
            })
        })
        .collect();

    NewsPage {
        articles,
        total_results: provider.total_results,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_map_page_drops_incomplete_articles() {
        let json = r#"{
            "status": "ok",
            "totalResults": 3,
            "articles": [
                {"source": {"name": "AgDaily"}, "title": "Monsoon outlook",
                 "description": "Rain ahead", "url": "https://news.example/1",
                 "urlToImage": "https://img.example/1.jpg",
                 "publishedAt": "2026-08-01T10:00:00Z"},
                {"source": null, "title": null, "url": "https://news.example/2"},
                {"source": null, "title": "No link article", "url": null}
            ]
        }"#;

        let provider: ProviderResponse = serde_json::from_str(json).unwrap();
        let page = map_page(provider);

        assert_eq!(page.total_results, 3);
        assert_eq!(page.articles.len(), 1);
        let article = page.articles.first().unwrap();
        assert_eq!(article.title, "Monsoon outlook");
        assert_eq!(article.source.as_deref(), Some("AgDaily"));
        assert_eq!(article.image_url.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[test]
    fn test_map_page_empty() {
        let provider: ProviderResponse = serde_json::from_str("{}").unwrap();
        let page = map_page(provider);
        assert_eq!(page.total_results, 0);
        assert!(page.articles.is_empty());
    }
}
