/// End-to-end job runs against in-memory collaborators.
///
/// Each test gets its own temporary output root; nothing touches the network.
mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;
use dcwatch::models::{
    Candidate, CandidatePool, Country, NewsSource, TrackedStock, WatchedCompany,
};
use dcwatch::services::job_scheduler_service::JobContext;
use dcwatch::services::seen_links::SeenLinkStore;

const BILLION: f64 = 1e9;

fn tracked(name: &str, ticker: &str) -> TrackedStock {
    TrackedStock {
        name: name.to_string(),
        ticker: ticker.to_string(),
        sector: "AI Chip".to_string(),
    }
}

fn candidate(name: &str, ticker: &str) -> Candidate {
    Candidate {
        name: name.to_string(),
        ticker: ticker.to_string(),
        exchange: "NASDAQ".to_string(),
    }
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Daily indicator report
// ---------------------------------------------------------------------------

mod daily_report {
    use super::*;
    use dcwatch::jobs::daily_report_job;

    #[tokio::test]
    async fn test_daily_job_writes_reports_and_skips_missing_tickers() {
        let mut universe = empty_universe();
        universe.daily_stocks = vec![tracked("NVIDIA", "NVDA"), tracked("Delisted Co", "GONE")];

        let prices = MockPriceProvider::default().with_series("NVDA", linear_series(252, 100.0, 150.0));
        let harness = TestHarness::new(
            "daily",
            universe,
            Arc::new(prices),
            Arc::new(MockNewsProvider::new(NewsSource::GoogleNews)),
            Arc::new(MockNewsProvider::new(NewsSource::Naver)),
        );

        let result = daily_report_job::run(harness.context.clone()).await.unwrap();
        assert_eq!(result.items_processed, 1);
        assert_eq!(result.items_failed, 1);

        let config = &harness.context.config;
        let json = TestHarness::files_with_prefix(&config.market_data_dir, "datacenter_stocks_");
        assert_eq!(json.len(), 1);
        let payload = read_json(&json[0]);
        assert_eq!(payload["total_stocks"], 1);
        assert_eq!(payload["stocks"][0]["ticker"], "NVDA");
        assert_eq!(payload["stocks"][0]["golden_cross"], true);

        assert_eq!(TestHarness::files_with_prefix(&config.analysis_dir, "datacenter_analysis_").len(), 1);
        let md = TestHarness::files_with_prefix(&config.analysis_dir, "datacenter_report_");
        assert_eq!(md.len(), 1);
        assert!(std::fs::read_to_string(&md[0]).unwrap().contains("**NVIDIA**"));

        let texts = harness.notifier.texts.lock();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("📊 총 1개 종목"));
        assert!(texts[0].contains("⭐ 골든크로스: 1개"));
    }

    #[tokio::test]
    async fn test_daily_job_with_no_data_still_reports() {
        let mut universe = empty_universe();
        universe.daily_stocks = vec![tracked("Delisted Co", "GONE")];

        let harness = TestHarness::new(
            "daily-empty",
            universe,
            Arc::new(MockPriceProvider::default()),
            Arc::new(MockNewsProvider::new(NewsSource::GoogleNews)),
            Arc::new(MockNewsProvider::new(NewsSource::Naver)),
        );

        let result = daily_report_job::run(harness.context.clone()).await.unwrap();
        assert_eq!(result.items_processed, 0);

        let json = TestHarness::files_with_prefix(&harness.context.config.market_data_dir, "datacenter_stocks_");
        assert_eq!(read_json(&json[0])["total_stocks"], 0);
        assert!(harness.notifier.texts.lock()[0].contains("📊 총 0개 종목"));
    }
}

// ---------------------------------------------------------------------------
// Monthly stock selection
// ---------------------------------------------------------------------------

mod stock_selection {
    use super::*;
    use dcwatch::jobs::stock_selection_job;

    fn pool() -> CandidatePool {
        CandidatePool {
            sub_sector: "GPU".to_string(),
            category: "AI Infrastructure".to_string(),
            sector: "AI Chip".to_string(),
            candidates: vec![
                candidate("Small Cap", "SML"),
                candidate("Mega Cap", "MEGA"),
                candidate("Young Listing", "IPO"),
                candidate("Large Cap", "LRG"),
            ],
        }
    }

    #[tokio::test]
    async fn test_selection_ranks_by_market_cap_and_excludes_short_history() {
        let mut universe = empty_universe();
        universe.candidate_pools = vec![pool()];

        let series = linear_series(252, 100.0, 150.0);
        let prices = Arc::new(
            MockPriceProvider::default()
                .with_series("SML", series.clone())
                .with_series("MEGA", series.clone())
                .with_series("LRG", series)
                .with_series("IPO", linear_series(100, 10.0, 30.0))
                .with_market_cap("SML", 6.0 * BILLION)
                .with_market_cap("MEGA", 120.0 * BILLION)
                .with_market_cap("LRG", 60.0 * BILLION)
                .with_market_cap("IPO", 500.0 * BILLION),
        );

        let harness = TestHarness::new(
            "selection",
            universe,
            prices.clone(),
            Arc::new(MockNewsProvider::new(NewsSource::GoogleNews)),
            Arc::new(MockNewsProvider::new(NewsSource::Naver)),
        );

        let result = stock_selection_job::run(harness.context.clone()).await.unwrap();
        assert_eq!(result.items_processed, 3);
        assert_eq!(result.items_failed, 1);
        // Excluded before the market cap lookup
        assert!(!prices.cap_requests.lock().contains(&"IPO".to_string()));

        let json = TestHarness::files_with_prefix(&harness.context.config.market_data_dir, "stock_selection_");
        let payload = read_json(&json[0]);
        assert_eq!(payload["total_selected"], 1);
        assert_eq!(payload["selected_stocks"][0]["ticker"], "MEGA");

        let ranked: Vec<&str> = payload["all_candidates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["ticker"].as_str().unwrap())
            .collect();
        assert_eq!(ranked, vec!["MEGA", "LRG", "SML"]);

        let caps: Vec<u64> = payload["all_candidates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["breakdown"]["market_cap"].as_u64().unwrap())
            .collect();
        assert_eq!(caps, vec![30, 25, 15]);

        let scores: Vec<f64> = payload["all_candidates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["score"].as_f64().unwrap())
            .collect();
        assert_eq!(scores[0] - scores[1], 5.0);
        assert_eq!(scores[1] - scores[2], 10.0);

        let analysis = &harness.context.config.analysis_dir;
        assert_eq!(TestHarness::files_with_prefix(analysis, "stock_selection_report_").len(), 1);
        assert!(harness.notifier.texts.lock()[0].contains("1. Mega Cap"));
    }

    #[tokio::test]
    async fn test_equal_scores_keep_pool_order() {
        let mut universe = empty_universe();
        universe.candidate_pools = vec![CandidatePool {
            candidates: vec![candidate("First Listed", "AAA"), candidate("Second Listed", "BBB")],
            ..pool()
        }];

        let series = linear_series(200, 50.0, 60.0);
        let prices = MockPriceProvider::default()
            .with_series("AAA", series.clone())
            .with_series("BBB", series);

        let harness = TestHarness::new(
            "selection-tie",
            universe,
            Arc::new(prices),
            Arc::new(MockNewsProvider::new(NewsSource::GoogleNews)),
            Arc::new(MockNewsProvider::new(NewsSource::Naver)),
        );

        stock_selection_job::run(harness.context.clone()).await.unwrap();

        let json = TestHarness::files_with_prefix(&harness.context.config.market_data_dir, "stock_selection_");
        let payload = read_json(&json[0]);
        assert_eq!(payload["selected_stocks"][0]["ticker"], "AAA");
        // Unknown market cap scores the lowest bucket
        assert_eq!(payload["selected_stocks"][0]["breakdown"]["market_cap"], 5);
    }

    #[tokio::test]
    async fn test_market_cap_lookups_share_the_price_courtesy_delay() {
        let mut universe = empty_universe();
        universe.candidate_pools = vec![CandidatePool {
            candidates: vec![candidate("First Listed", "AAA"), candidate("Second Listed", "BBB")],
            ..pool()
        }];

        let series = linear_series(200, 50.0, 60.0);
        let prices = MockPriceProvider::default()
            .with_series("AAA", series.clone())
            .with_series("BBB", series)
            .with_market_cap("AAA", 20.0 * BILLION)
            .with_market_cap("BBB", 20.0 * BILLION);

        let harness = TestHarness::new(
            "selection-delay",
            universe,
            Arc::new(prices),
            Arc::new(MockNewsProvider::new(NewsSource::GoogleNews)),
            Arc::new(MockNewsProvider::new(NewsSource::Naver)),
        );
        let mut config = (*harness.context.config).clone();
        config.delays.price_history = Duration::from_millis(60);
        let context = JobContext {
            config: Arc::new(config),
            ..harness.context.clone()
        };

        let started = Instant::now();
        let result = stock_selection_job::run(context).await.unwrap();
        assert_eq!(result.items_processed, 2);

        // history, cap, history, cap: three spaced calls after the first
        assert!(
            started.elapsed() >= Duration::from_millis(170),
            "elapsed {:?}",
            started.elapsed()
        );
    }
}

// ---------------------------------------------------------------------------
// News monitor
// ---------------------------------------------------------------------------

mod news_monitor {
    use super::*;
    use dcwatch::jobs::news_monitor_job;

    fn watch_list() -> Vec<WatchedCompany> {
        vec![
            WatchedCompany {
                name: "NVIDIA".to_string(),
                ticker: "NVDA".to_string(),
                priority: 1,
                country: Country::US,
                search_terms: vec![
                    "NVIDIA AI".to_string(),
                    "NVIDIA datacenter".to_string(),
                    "NVIDIA Blackwell".to_string(),
                ],
            },
            WatchedCompany {
                name: "SK hynix".to_string(),
                ticker: "000660.KS".to_string(),
                priority: 1,
                country: Country::KR,
                search_terms: vec!["SK하이닉스 HBM".to_string()],
            },
        ]
    }

    fn google() -> MockNewsProvider {
        MockNewsProvider::new(NewsSource::GoogleNews)
            .with_results(
                "NVIDIA AI",
                vec![
                    fresh_article(NewsSource::GoogleNews, "NVIDIA posts record earnings", "https://news.test/n1", 2),
                    fresh_article(NewsSource::GoogleNews, "NVIDIA opens Berlin office", "https://news.test/n2", 1),
                    fresh_article(NewsSource::GoogleNews, "NVIDIA story reported yesterday", "https://news.test/seen", 3),
                ],
            )
            .with_results(
                "NVIDIA datacenter",
                vec![fresh_article(NewsSource::GoogleNews, "NVIDIA signs cloud contract", "https://news.test/n3", 1)],
            )
    }

    fn naver() -> MockNewsProvider {
        MockNewsProvider::new(NewsSource::Naver).with_results(
            "SK하이닉스 HBM",
            vec![fresh_article(NewsSource::Naver, "SK하이닉스 HBM4 양산 본격화 소식", "https://news.test/k1", 4)],
        )
    }

    #[tokio::test]
    async fn test_news_job_collects_ranks_translates_and_dedups() {
        let mut universe = empty_universe();
        universe.watch_list = watch_list();

        let google = Arc::new(google());
        let harness = TestHarness::new(
            "news",
            universe,
            Arc::new(MockPriceProvider::default()),
            google.clone(),
            Arc::new(naver()),
        );

        let config = harness.context.config.clone();
        config.ensure_dirs().unwrap();
        let mut seen = SeenLinkStore::in_dir(&config.market_data_dir);
        seen.add("https://news.test/seen");
        seen.flush().unwrap();

        let result = news_monitor_job::run(harness.context.clone()).await.unwrap();
        // NVIDIA keeps its top two, SK hynix has one
        assert_eq!(result.items_processed, 3);
        // Only the first two search terms of a US company are queried
        assert_eq!(*google.queries.lock(), vec!["NVIDIA AI", "NVIDIA datacenter"]);

        let json = TestHarness::files_with_prefix(&config.market_data_dir, "news_data_");
        let payload = read_json(&json[0]);
        assert_eq!(payload["stats"]["google"], 3);
        assert_eq!(payload["stats"]["naver"], 1);

        let nvidia = payload["news_by_company"]["NVIDIA"].as_array().unwrap();
        let links: Vec<&str> = nvidia.iter().map(|n| n["link"].as_str().unwrap()).collect();
        // "earnings" is high tier, "contract" medium, the office story scores the floor
        assert_eq!(links, vec!["https://news.test/n1", "https://news.test/n3"]);
        assert_eq!(nvidia[0]["score"], 10);
        assert_eq!(nvidia[0]["translated_title"], "[ko] NVIDIA posts record earnings");

        let hynix = &payload["news_by_company"]["SK hynix"][0];
        assert_eq!(hynix["translated_title"], hynix["title"]);

        let history = SeenLinkStore::in_dir(&config.market_data_dir);
        for link in ["https://news.test/n1", "https://news.test/n2", "https://news.test/n3", "https://news.test/k1"] {
            assert!(history.contains(link), "{} should be recorded", link);
        }

        assert_eq!(TestHarness::files_with_prefix(&config.analysis_dir, "news_analysis_").len(), 1);
        assert_eq!(TestHarness::files_with_prefix(&config.analysis_dir, "news_report_").len(), 1);
        let docx = TestHarness::files_with_prefix(&config.output_dir, "news_report_");
        assert_eq!(docx.len(), 1);

        assert!(harness.notifier.texts.lock()[0].contains("📊 수집: 3개 기사"));
        let files = harness.notifier.files.lock();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, docx[0]);
        drop(files);

        // A second run finds nothing new
        let again = news_monitor_job::run(harness.context.clone()).await.unwrap();
        assert_eq!(again.items_processed, 0);
    }

    #[tokio::test]
    async fn test_news_job_without_naver_credentials_skips_korean_sources() {
        let mut universe = empty_universe();
        universe.watch_list = watch_list();

        let naver = Arc::new(MockNewsProvider::disabled(NewsSource::Naver));
        let harness = TestHarness::new(
            "news-no-naver",
            universe,
            Arc::new(MockPriceProvider::default()),
            Arc::new(google()),
            naver.clone(),
        );

        let result = news_monitor_job::run(harness.context.clone()).await.unwrap();
        assert_eq!(result.items_processed, 2);
        assert!(naver.queries.lock().is_empty());
    }
}
