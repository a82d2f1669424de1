use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::external::telegram::TelegramNotifier;

/// Best-effort message delivery. Failures are logged by the implementation
/// and reported as `false`, never raised.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn is_enabled(&self) -> bool;

    async fn send_text(&self, message: &str) -> bool;

    async fn send_file(&self, path: &Path, caption: &str) -> bool;
}

/// Used when no bot credentials are configured.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send_text(&self, _message: &str) -> bool {
        debug!("Notifier disabled, message not sent");
        false
    }

    async fn send_file(&self, path: &Path, _caption: &str) -> bool {
        debug!("Notifier disabled, {} not sent", path.display());
        false
    }
}

/// Telegram when both token and chat id are present, else a disabled notifier.
pub fn notifier_from_config(config: &AppConfig) -> Arc<dyn Notifier> {
    match &config.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(
            telegram.clone(),
            config.request_timeout,
            config.upload_timeout,
        )),
        None => {
            info!("Telegram not configured; notifications disabled");
            Arc::new(DisabledNotifier)
        }
    }
}
