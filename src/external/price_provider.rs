use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::PriceSeries;

/// Roughly one year of trading days, requested for every ticker.
pub const HISTORY_DAYS: u32 = 365;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily closes and volumes covering roughly `days` calendar days, oldest first.
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<PriceSeries, PriceProviderError>;

    /// Market capitalisation in the listing currency.
    async fn fetch_market_cap(&self, ticker: &str) -> Result<f64, PriceProviderError>;
}

/// History for `ticker`, or an empty series when the provider fails.
/// An empty series means "unavailable" to every caller.
pub async fn history_or_empty(provider: &dyn PriceProvider, ticker: &str) -> PriceSeries {
    match provider.fetch_daily_history(ticker, HISTORY_DAYS).await {
        Ok(series) => series,
        Err(e) => {
            warn!("Price history unavailable for {}: {}", ticker, e);
            PriceSeries::empty()
        }
    }
}

/// Market cap for `ticker`, or 0 when the provider fails (scores the lowest bucket).
pub async fn market_cap_or_zero(provider: &dyn PriceProvider, ticker: &str) -> f64 {
    match provider.fetch_market_cap(ticker).await {
        Ok(cap) => cap,
        Err(e) => {
            warn!("Market cap unavailable for {}: {}", ticker, e);
            0.0
        }
    }
}
