//! In-memory collaborators shared by the job integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dcwatch::config::AppConfig;
use dcwatch::errors::AppError;
use dcwatch::external::news_provider::NewsProvider;
use dcwatch::external::price_provider::{PriceProvider, PriceProviderError};
use dcwatch::external::translator::Translator;
use dcwatch::models::{
    KeywordTaxonomy, NewsSource, PricePoint, PriceSeries, RawArticle, Universe,
};
use dcwatch::services::job_scheduler_service::JobContext;
use dcwatch::services::notification_service::Notifier;

pub fn temp_root(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dcwatch-{}-{}", label, uuid::Uuid::new_v4()))
}

/// `len` daily samples rising linearly from `start` to `end`, constant volume.
pub fn linear_series(len: usize, start: f64, end: f64) -> PriceSeries {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let step = if len > 1 { (end - start) / (len - 1) as f64 } else { 0.0 };
    PriceSeries::new(
        (0..len)
            .map(|i| PricePoint {
                date: first + Duration::days(i as i64),
                close: start + step * i as f64,
                volume: 1_000_000.0,
            })
            .collect(),
    )
}

pub fn empty_universe() -> Universe {
    Universe {
        daily_stocks: vec![],
        watch_list: vec![],
        candidate_pools: vec![],
        english_keywords: KeywordTaxonomy::english(),
        korean_keywords: KeywordTaxonomy::korean(),
    }
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockPriceProvider {
    pub series: HashMap<String, PriceSeries>,
    pub market_caps: HashMap<String, f64>,
    pub cap_requests: Mutex<Vec<String>>,
}

impl MockPriceProvider {
    pub fn with_series(mut self, ticker: &str, series: PriceSeries) -> Self {
        self.series.insert(ticker.to_string(), series);
        self
    }

    pub fn with_market_cap(mut self, ticker: &str, cap: f64) -> Self {
        self.market_caps.insert(ticker.to_string(), cap);
        self
    }
}

#[async_trait]
impl PriceProvider for MockPriceProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        _days: u32,
    ) -> Result<PriceSeries, PriceProviderError> {
        self.series
            .get(ticker)
            .cloned()
            .ok_or(PriceProviderError::NotFound)
    }

    async fn fetch_market_cap(&self, ticker: &str) -> Result<f64, PriceProviderError> {
        self.cap_requests.lock().push(ticker.to_string());
        self.market_caps
            .get(ticker)
            .copied()
            .ok_or(PriceProviderError::NotFound)
    }
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

pub struct MockNewsProvider {
    pub source: NewsSource,
    pub enabled: bool,
    pub results: HashMap<String, Vec<RawArticle>>,
    pub queries: Mutex<Vec<String>>,
}

impl MockNewsProvider {
    pub fn new(source: NewsSource) -> Self {
        Self {
            source,
            enabled: true,
            results: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn disabled(source: NewsSource) -> Self {
        Self {
            enabled: false,
            ..Self::new(source)
        }
    }

    pub fn with_results(mut self, query: &str, articles: Vec<RawArticle>) -> Self {
        self.results.insert(query.to_string(), articles);
        self
    }
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    fn source(&self) -> NewsSource {
        self.source
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn search(&self, query: &str) -> Result<Vec<RawArticle>, AppError> {
        self.queries.lock().push(query.to_string());
        match self.results.get(query) {
            Some(articles) => Ok(articles.clone()),
            None => Err(AppError::External(format!("no canned results for {}", query))),
        }
    }
}

pub fn fresh_article(source: NewsSource, title: &str, link: &str, hours_ago: i64) -> RawArticle {
    RawArticle {
        title: title.to_string(),
        description: format!("{} with enough words for a summary", title),
        link: link.to_string(),
        publisher: "Wire".to_string(),
        source,
        published_at: Some(Utc::now() - Duration::hours(hours_ago)),
    }
}

// ---------------------------------------------------------------------------
// Translation and delivery
// ---------------------------------------------------------------------------

pub struct PrefixTranslator;

#[async_trait]
impl Translator for PrefixTranslator {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String, AppError> {
        Ok(format!("[{}] {}", target, text))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub texts: Mutex<Vec<String>>,
    pub files: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send_text(&self, message: &str) -> bool {
        self.texts.lock().push(message.to_string());
        true
    }

    async fn send_file(&self, path: &Path, caption: &str) -> bool {
        self.files.lock().push((path.to_path_buf(), caption.to_string()));
        true
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

pub struct TestHarness {
    pub root: PathBuf,
    pub notifier: Arc<RecordingNotifier>,
    pub context: JobContext,
}

impl TestHarness {
    pub fn new(
        label: &str,
        universe: Universe,
        prices: Arc<MockPriceProvider>,
        google: Arc<MockNewsProvider>,
        naver: Arc<MockNewsProvider>,
    ) -> Self {
        let root = temp_root(label);
        let notifier = Arc::new(RecordingNotifier::default());
        let context = JobContext {
            config: Arc::new(AppConfig::offline(&root)),
            universe: Arc::new(universe),
            price_provider: prices,
            google_news: google,
            naver_news: naver,
            translator: Arc::new(PrefixTranslator),
            notifier: notifier.clone(),
        };
        Self {
            root,
            notifier,
            context,
        }
    }

    /// Files in `dir` whose name starts with `prefix`.
    pub fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|p| {
                        p.file_name()
                            .map(|n| n.to_string_lossy().starts_with(prefix))
                            .unwrap_or(false)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}
