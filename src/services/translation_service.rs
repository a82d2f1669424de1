use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::external::translator::Translator;

pub const TITLE_MAX_CHARS: usize = 300;
pub const DESCRIPTION_MAX_CHARS: usize = 200;
/// Text with a larger share of Hangul syllables is treated as already Korean.
const HANGUL_SKIP_RATIO: f64 = 0.3;

const SOURCE_LANG: &str = "en";
const TARGET_LANG: &str = "ko";

/// Share of characters that are precomposed Hangul syllables (가..힣).
pub fn hangul_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let hangul = text.chars().filter(|c| ('가'..='힣').contains(c)).count();
    hangul as f64 / total as f64
}

/// Shortens to `max_chars` characters, the last three being `...`.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// English to Korean translation for report text. Never fails: anything that
/// cannot be translated comes back unchanged.
#[derive(Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    delay: Duration,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>, delay: Duration) -> Self {
        Self { translator, delay }
    }

    pub fn is_enabled(&self) -> bool {
        self.translator.is_enabled()
    }

    /// Pause between successive translation calls.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn translate(&self, text: &str, max_chars: usize) -> String {
        if text.trim().is_empty() || hangul_ratio(text) > HANGUL_SKIP_RATIO || !self.is_enabled() {
            return text.to_string();
        }

        let prepared = truncate_with_ellipsis(text.trim(), max_chars);
        match self.translator.translate(&prepared, SOURCE_LANG, TARGET_LANG).await {
            Ok(translated) if !translated.trim().is_empty() => {
                debug!("Translated {} chars", prepared.chars().count());
                translated
            }
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!("Translation failed, keeping original: {}", e);
                text.to_string()
            }
        }
    }
}
