use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::{PricePoint, PriceSeries};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";
/// Sets the session cookie the crumb is bound to. Answers 404, which is fine.
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

/// Yahoo Finance provider. No API key required; covers US, KRX/KOSDAQ (.KS/.KQ),
/// HK, TW and EU listings.
///
/// The chart endpoint is open. The quote endpoint needs a session cookie plus
/// the matching crumb, fetched once and reused until Yahoo rejects it.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceProvider {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (compatible; dcwatch/0.1)")
                .cookie_store(true)
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            crumb: Mutex::new(None),
        }
    }

    async fn crumb(&self) -> Result<String, PriceProviderError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        self.client
            .get(COOKIE_URL)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.without_url().to_string()))?;

        let resp = self
            .client
            .get(CRUMB_URL)
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.without_url().to_string()))?;
        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!("crumb HTTP {}", resp.status())));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;
        let crumb = parse_crumb(&body)
            .ok_or_else(|| PriceProviderError::BadResponse("Unusable crumb response".into()))?;

        debug!("Obtained Yahoo crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn forget_crumb(&self) {
        *self.crumb.lock().await = None;
    }
}

/// A crumb is a short opaque token. HTML or JSON error pages are not crumbs.
fn parse_crumb(body: &str) -> Option<String> {
    let crumb = body.trim();
    let plausible = !crumb.is_empty()
        && crumb.len() <= 64
        && !crumb.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '{' | '}'));
    plausible.then(|| crumb.to_string())
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteResponse {
    quote_response: YahooQuoteBody,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteBody {
    #[serde(default)]
    result: Vec<YahooQuoteItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteItem {
    market_cap: Option<f64>,
}

/// Yahoo accepts fixed range tokens only.
fn range_for_days(days: u32) -> &'static str {
    if days <= 5 {
        "5d"
    } else if days <= 30 {
        "1mo"
    } else if days <= 90 {
        "3mo"
    } else if days <= 180 {
        "6mo"
    } else if days <= 365 {
        "1y"
    } else if days <= 730 {
        "2y"
    } else {
        "5y"
    }
}

fn parse_chart(body: YahooChartResponse) -> Result<PriceSeries, PriceProviderError> {
    if let Some(error) = body.chart.error {
        if error.description.contains("No data found") {
            return Err(PriceProviderError::NotFound);
        }
        return Err(PriceProviderError::BadResponse(error.description));
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
        .ok_or(PriceProviderError::NotFound)?;

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| PriceProviderError::BadResponse("No quote data in response".into()))?;

    if result.timestamp.len() != quote.close.len() {
        return Err(PriceProviderError::Parse(
            "Timestamp and close price arrays have different lengths".into(),
        ));
    }

    let points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .zip(quote.close.iter())
        .enumerate()
        .filter_map(|(i, (timestamp, close_opt))| {
            // Skip null closes (holidays, halted sessions)
            let close = (*close_opt)?;
            let date = chrono::DateTime::from_timestamp(*timestamp, 0)?.date_naive();
            let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0);
            Some(PricePoint { date, close, volume })
        })
        .collect();

    Ok(PriceSeries::new(points))
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<PriceSeries, PriceProviderError> {
        let url = format!("{}/{}", CHART_URL, ticker);

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", range_for_days(days))])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PriceProviderError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body: YahooChartResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        parse_chart(body)
    }

    async fn fetch_market_cap(&self, ticker: &str) -> Result<f64, PriceProviderError> {
        let crumb = self.crumb().await?;
        let resp = self
            .client
            .get(QUOTE_URL)
            .query(&[("symbols", ticker), ("crumb", crumb.as_str())])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.without_url().to_string()))?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceProviderError::RateLimited);
        }
        if matches!(
            resp.status(),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
        ) {
            // Expired session; the next call fetches a fresh cookie and crumb
            self.forget_crumb().await;
            return Err(PriceProviderError::BadResponse(format!(
                "crumb rejected (HTTP {})",
                resp.status()
            )));
        }
        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!("HTTP {}", resp.status())));
        }

        let body: YahooQuoteResponse = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        body.quote_response
            .result
            .first()
            .and_then(|item| item.market_cap)
            .ok_or(PriceProviderError::NotFound)
    }
}
