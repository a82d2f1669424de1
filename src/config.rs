use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::Universe;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Naver Open API credentials, shared by news search and Papago translation.
#[derive(Debug, Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Pauses between successive calls to the same service.
#[derive(Debug, Clone, Copy)]
pub struct CourtesyDelays {
    pub google_news: Duration,
    pub naver_news: Duration,
    pub translation: Duration,
    pub price_history: Duration,
}

impl Default for CourtesyDelays {
    fn default() -> Self {
        Self {
            google_news: Duration::from_millis(1000),
            naver_news: Duration::from_millis(300),
            translation: Duration::from_millis(500),
            price_history: Duration::from_millis(0),
        }
    }
}

impl CourtesyDelays {
    pub fn none() -> Self {
        Self {
            google_news: Duration::ZERO,
            naver_news: Duration::ZERO,
            translation: Duration::ZERO,
            price_history: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub market_data_dir: PathBuf,
    pub analysis_dir: PathBuf,
    pub output_dir: PathBuf,
    pub telegram: Option<TelegramConfig>,
    pub naver: Option<NaverCredentials>,
    pub universe_path: Option<PathBuf>,
    pub delays: CourtesyDelays,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
    pub scheduler_test_mode: bool,
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let telegram = match (non_empty_var("TELEGRAM_BOT_TOKEN"), non_empty_var("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };

        let naver = match (non_empty_var("NAVER_CLIENT_ID"), non_empty_var("NAVER_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(NaverCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        Self {
            market_data_dir: non_empty_var("MARKET_DATA_DIR")
                .unwrap_or_else(|| "market_data".to_string())
                .into(),
            analysis_dir: non_empty_var("ANALYSIS_DIR")
                .unwrap_or_else(|| "analysis_reports".to_string())
                .into(),
            output_dir: non_empty_var("OUTPUT_DIR")
                .unwrap_or_else(|| "outputs".to_string())
                .into(),
            telegram,
            naver,
            universe_path: non_empty_var("DCWATCH_UNIVERSE").map(PathBuf::from),
            delays: CourtesyDelays::default(),
            request_timeout: Duration::from_secs(10),
            upload_timeout: Duration::from_secs(30),
            scheduler_test_mode: std::env::var("JOB_SCHEDULER_TEST_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<bool>()
                .unwrap_or(false),
        }
    }

    /// Config rooted in `root` with every optional feature disabled and no
    /// courtesy delays. Used by tests and dry runs.
    pub fn offline(root: &Path) -> Self {
        Self {
            market_data_dir: root.join("market_data"),
            analysis_dir: root.join("analysis_reports"),
            output_dir: root.join("outputs"),
            telegram: None,
            naver: None,
            universe_path: None,
            delays: CourtesyDelays::none(),
            request_timeout: Duration::from_secs(10),
            upload_timeout: Duration::from_secs(30),
            scheduler_test_mode: false,
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.market_data_dir, &self.analysis_dir, &self.output_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Universe from `DCWATCH_UNIVERSE` when set and readable, else the built-in tables.
    pub fn load_universe(&self) -> Universe {
        let Some(path) = &self.universe_path else {
            return Universe::builtin();
        };

        match Universe::load(path) {
            Ok(universe) => {
                info!("Loaded universe from {}", path.display());
                universe
            }
            Err(e) => {
                warn!("Falling back to built-in universe ({}): {}", path.display(), e);
                Universe::builtin()
            }
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Config: telegram={} naver={} market_data={} analysis={} outputs={}",
            if self.telegram.is_some() { "✓" } else { "✗" },
            if self.naver.is_some() { "✓" } else { "✗" },
            self.market_data_dir.display(),
            self.analysis_dir.display(),
            self.output_dir.display(),
        );
    }
}
