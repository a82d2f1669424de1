use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::config::NaverCredentials;
use crate::errors::AppError;
use crate::external::translator::Translator;

const PAPAGO_URL: &str = "https://openapi.naver.com/v1/papago/n2mt";

/// Naver Papago neural machine translation.
pub struct PapagoTranslator {
    credentials: Option<NaverCredentials>,
    client: Client,
}

impl PapagoTranslator {
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
struct PapagoResponse {
    message: PapagoMessage,
}

#[derive(Debug, Deserialize)]
struct PapagoMessage {
    result: PapagoResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PapagoResult {
    #[serde(default)]
    translated_text: String,
}

fn translated_text(body: PapagoResponse) -> Option<String> {
    let text = body.message.result.translated_text;
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl Translator for PapagoTranslator {
    fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, AppError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| AppError::Config("Papago credentials not configured".to_string()))?;

        let response = self
            .client
            .post(PAPAGO_URL)
            .header("X-Naver-Client-Id", &credentials.client_id)
            .header("X-Naver-Client-Secret", &credentials.client_secret)
            .form(&[("source", source), ("target", target), ("text", text)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Papago returned {}", response.status());
            return Err(AppError::External(format!(
                "Papago returned {}",
                response.status()
            )));
        }

        let body: PapagoResponse = response
            .json()
            .await
            .map_err(|e| AppError::External(format!("Failed to parse Papago response: {}", e)))?;

        translated_text(body)
            .ok_or_else(|| AppError::External("Papago returned an empty translation".to_string()))
    }
}
