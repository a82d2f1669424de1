use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{NewsSource, RawArticle};

/// Maximum entries taken from one search response.
pub const MAX_RESULTS_PER_QUERY: usize = 20;

/// A news search backend. Implementations only fetch and parse; recency,
/// length and dedup filtering happen in the news service.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn source(&self) -> NewsSource;

    /// Disabled providers (e.g. missing credentials) are skipped without a request.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, AppError>;
}
