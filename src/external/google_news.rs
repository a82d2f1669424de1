use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, error};

use crate::errors::AppError;
use crate::external::markup::{plain_text, strip_urls, truncate_chars};
use crate::external::news_provider::{NewsProvider, MAX_RESULTS_PER_QUERY};
use crate::models::{NewsSource, RawArticle};

const FEED_URL: &str = "https://news.google.com/rss/search";
const SUMMARY_MAX_CHARS: usize = 300;
/// Summaries shorter than this are noise (usually just the publisher name).
const SUMMARY_MIN_CHARS: usize = 20;

static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| element_pattern("item"));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| element_pattern("title"));
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| element_pattern("link"));
static PUB_DATE_RE: LazyLock<Regex> = LazyLock::new(|| element_pattern("pubDate"));
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| element_pattern("description"));
static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| element_pattern("source"));

/// Matches `<tag ...>content</tag>`, capturing the content.
fn element_pattern(tag: &str) -> Regex {
    Regex::new(&format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>")).expect("element pattern")
}

/// Google News search via its public RSS endpoint. No credentials needed.
pub struct GoogleNewsProvider {
    client: Client,
}

impl GoogleNewsProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

/// Text content of the first element matched by `element`.
fn extract_tag(xml: &str, element: &Regex) -> Option<String> {
    element
        .captures(xml)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn clean_summary(raw: &str) -> String {
    let text = strip_urls(&plain_text(raw));
    let text = truncate_chars(text.trim(), SUMMARY_MAX_CHARS);
    if text.chars().count() < SUMMARY_MIN_CHARS {
        String::new()
    } else {
        text
    }
}

/// Parses the first `MAX_RESULTS_PER_QUERY` items of an RSS 2.0 document.
pub fn parse_feed(xml: &str) -> Vec<RawArticle> {
    ITEM_RE
        .captures_iter(xml)
        .take(MAX_RESULTS_PER_QUERY)
        .filter_map(|cap| {
            let item = cap.get(1)?.as_str();

            let title = plain_text(&extract_tag(item, &TITLE_RE).unwrap_or_default());
            let link = plain_text(&extract_tag(item, &LINK_RE).unwrap_or_default());
            let published_at = extract_tag(item, &PUB_DATE_RE)
                .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
                .map(|d| d.with_timezone(&Utc));
            let description = clean_summary(&extract_tag(item, &DESCRIPTION_RE).unwrap_or_default());
            let publisher = extract_tag(item, &SOURCE_RE)
                .map(|s| plain_text(&s))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Google News".to_string());

            Some(RawArticle {
                title,
                description,
                link,
                publisher,
                source: NewsSource::GoogleNews,
                published_at,
            })
        })
        .collect()
}

#[async_trait]
impl NewsProvider for GoogleNewsProvider {
    fn source(&self) -> NewsSource {
        NewsSource::GoogleNews
    }

    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, AppError> {
        debug!("Fetching Google News RSS for query: {}", query);

        let response = self
            .client
            .get(FEED_URL)
            .query(&[("q", query), ("hl", "en-US"), ("gl", "US"), ("ceid", "US:en")])
            .send()
            .await
            .map_err(|e| {
                error!("Google News request failed: {}", e);
                AppError::External(format!("Google News error: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::External(format!(
                "Google News returned {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::External(format!("Failed to read feed: {}", e)))?;

        Ok(parse_feed(&body))
    }
}
