use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{error, warn};

use crate::config::TelegramConfig;
use crate::services::notification_service::Notifier;

const API_BASE: &str = "https://api.telegram.org";

/// Telegram Bot API delivery to a single chat.
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: Client,
    api_base: String,
    upload_timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, timeout: Duration, upload_timeout: Duration) -> Self {
        Self {
            config,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_base: API_BASE.to_string(),
            upload_timeout,
        }
    }

    /// Points the notifier at another Bot API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.config.bot_token, method)
    }

    /// Error text safe to log. The request URL embeds the bot token, so it is
    /// dropped, and any remaining occurrence of the token is masked.
    fn describe(&self, e: reqwest::Error) -> String {
        let text = e.without_url().to_string();
        if self.config.bot_token.is_empty() {
            return text;
        }
        text.replace(&self.config.bot_token, "<redacted>")
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn send_text(&self, message: &str) -> bool {
        let result = self
            .client
            .post(self.method_url("sendMessage"))
            .form(&[("chat_id", self.config.chat_id.as_str()), ("text", message)])
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("Telegram sendMessage returned {}", resp.status());
                false
            }
            Err(e) => {
                error!("Telegram sendMessage failed: {}", self.describe(e));
                false
            }
        }
    }

    async fn send_file(&self, path: &Path, caption: &str) -> bool {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Cannot read {} for upload: {}", path.display(), e);
                return false;
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());

        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text("caption", caption.to_string())
            .part("document", Part::bytes(bytes).file_name(file_name));

        let result = self
            .client
            .post(self.method_url("sendDocument"))
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("Telegram sendDocument returned {}", resp.status());
                false
            }
            Err(e) => {
                error!("Telegram sendDocument failed: {}", self.describe(e));
                false
            }
        }
    }
}
