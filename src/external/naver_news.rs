use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::NaverCredentials;
use crate::errors::AppError;
use crate::external::markup::plain_text;
use crate::external::news_provider::{NewsProvider, MAX_RESULTS_PER_QUERY};
use crate::models::{NewsSource, RawArticle};

const SEARCH_URL: &str = "https://openapi.naver.com/v1/search/news.json";

/// Korean news via the Naver Search API. Disabled without credentials.
pub struct NaverNewsProvider {
    credentials: Option<NaverCredentials>,
    client: Client,
}

impl NaverNewsProvider {
    pub fn new(credentials: Option<NaverCredentials>, timeout: Duration) -> Self {
        Self {
            credentials,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NaverSearchResponse {
    #[serde(default)]
    items: Vec<NaverNewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaverNewsItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    originallink: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    pub_date: String,
}

/// Host of the publisher's own URL, e.g. `www.hankyung.com`.
fn publisher_host(original_link: &str) -> Option<String> {
    url::Url::parse(original_link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

fn to_article(item: NaverNewsItem) -> RawArticle {
    let original = item.originallink.trim();
    let link = if original.is_empty() {
        item.link.trim().to_string()
    } else {
        original.to_string()
    };

    RawArticle {
        title: plain_text(&item.title),
        description: plain_text(&item.description),
        publisher: publisher_host(original).unwrap_or_else(|| "Naver".to_string()),
        link,
        source: NewsSource::Naver,
        published_at: DateTime::parse_from_rfc2822(item.pub_date.trim())
            .ok()
            .map(|d| d.with_timezone(&Utc)),
    }
}

#[async_trait]
impl NewsProvider for NaverNewsProvider {
    fn source(&self) -> NewsSource {
        NewsSource::Naver
    }

    fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, AppError> {
        let Some(credentials) = &self.credentials else {
            return Ok(Vec::new());
        };

        debug!("Fetching Naver news for query: {}", query);

        let display = MAX_RESULTS_PER_QUERY.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .header("X-Naver-Client-Id", &credentials.client_id)
            .header("X-Naver-Client-Secret", &credentials.client_secret)
            .query(&[("query", query), ("display", display.as_str()), ("sort", "date")])
            .send()
            .await
            .map_err(|e| {
                error!("Naver search request failed: {}", e);
                AppError::External(format!("Naver search error: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "Naver search returned {}",
                response.status()
            )));
        }

        let body: NaverSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("Failed to parse Naver response: {}", e)))?;

        Ok(body.items.into_iter().map(to_article).collect())
    }
}
