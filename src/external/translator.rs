use async_trait::async_trait;

use crate::errors::AppError;

/// A machine-translation backend. Callers decide what to translate and how
/// to degrade; implementations just make the call.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Disabled translators (missing credentials) are never called.
    fn is_enabled(&self) -> bool {
        true
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, AppError>;
}

/// Translator used when no credentials are configured.
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, AppError> {
        Ok(text.to_string())
    }
}
