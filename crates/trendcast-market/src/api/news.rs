//! NewsAPI client for ticker headlines

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Headline shown next to the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Source of headlines for a query
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// At most `limit` articles; any provider failure yields an empty list
    async fn headlines(&self, query: &str, limit: usize) -> Vec<NewsArticle>;
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    url: Option<String>,
    source: Option<RawSource>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl RawArticle {
    fn into_article(self) -> Option<NewsArticle> {
        Some(NewsArticle {
            title: self.title.filter(|t| !t.trim().is_empty())?,
            url: self
                .url
                .map(|u| u.trim().to_string())
                .filter(|u| is_web_link(u))?,
            source: self.source.and_then(|s| s.name),
            published_at: self.published_at,
        })
    }
}

/// Only `http` and `https` links are rendered as anchors
fn is_web_link(raw: &str) -> bool {
    reqwest::Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// NewsAPI client with rate limiting
pub struct NewsApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    rate_limiter: SharedRateLimiter,
    timeout: Duration,
}

impl NewsApiClient {
    /// Create a new NewsAPI client
    ///
    /// # Arguments
    /// * `api_key` - NewsAPI key; without one every lookup returns no articles
    /// * `base_url` - API host, e.g. `https://newsapi.org`
    /// * `rate_limit` - Requests per minute
    /// * `timeout` - Per-request bound
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            timeout,
        })
    }

    /// Create a client from market configuration
    pub fn from_config(config: &MarketConfig) -> Result<Self> {
        Self::new(
            config.news_api_key.clone(),
            &config.news_base_url,
            config.news_rate_limit,
            config.request_timeout,
        )
    }

    /// Query `/v2/everything`, surfacing every failure as an error
    pub async fn everything(&self, query: &str) -> Result<Vec<NewsArticle>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MarketError::Config("NEWS_API_KEY is not set".to_string()))?;

        // the rate-limit wait counts against the same bound as the request
        tokio::time::timeout(self.timeout, self.fetch_everything(query, api_key))
            .await
            .map_err(|_| MarketError::Timeout {
                operation: format!("NewsAPI lookup for {query}"),
                seconds: self.timeout.as_secs(),
            })?
    }

    async fn fetch_everything(&self, query: &str, api_key: &str) -> Result<Vec<NewsArticle>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/v2/everything", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("apiKey", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::ApiError(format!(
                "NewsAPI error {status}: {body}"
            )));
        }

        let body = response.text().await?;
        let parsed: EverythingResponse = serde_json::from_str(&body)?;
        Ok(parsed
            .articles
            .into_iter()
            .filter_map(RawArticle::into_article)
            .collect())
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn headlines(&self, query: &str, limit: usize) -> Vec<NewsArticle> {
        match self.everything(query).await {
            Ok(mut articles) => {
                articles.truncate(limit);
                tracing::debug!(query, count = articles.len(), "fetched headlines");
                articles
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "news lookup failed, showing no articles");
                Vec::new()
            }
        }
    }
}
