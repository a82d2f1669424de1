use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market a watched company is listed in. Drives which news provider and
/// which keyword taxonomy apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    US,
    KR,
}

impl Country {
    pub fn flag(&self) -> &'static str {
        match self {
            Country::US => "🇺🇸",
            Country::KR => "🇰🇷",
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Country::US => write!(f, "US"),
            Country::KR => write!(f, "KR"),
        }
    }
}

/// Where an article came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsSource {
    #[serde(rename = "Google News")]
    GoogleNews,
    #[serde(rename = "Naver API")]
    Naver,
}

impl std::fmt::Display for NewsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsSource::GoogleNews => write!(f, "Google News"),
            NewsSource::Naver => write!(f, "Naver API"),
        }
    }
}

/// An article as returned by a provider, before filtering and scoring.
#[derive(Debug, Clone)]
pub struct RawArticle {
    pub title: String,
    pub description: String,
    pub link: String,
    pub publisher: String,
    pub source: NewsSource,
    pub published_at: Option<DateTime<Utc>>,
}

/// A collected, scored article. `link` is its identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub publisher: String,
    pub source: NewsSource,
    #[serde(rename = "date")]
    pub published_at: DateTime<Utc>,
    pub score: u32,
    pub matched_keywords: Vec<String>,
    pub company: String,
    pub country: Country,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_description: Option<String>,
}

impl NewsItem {
    /// Title to show in reports: translation when present, else the original.
    pub fn display_title(&self) -> &str {
        self.translated_title.as_deref().unwrap_or(&self.title)
    }

    pub fn display_description(&self) -> &str {
        self.translated_description
            .as_deref()
            .unwrap_or(&self.description)
    }

    pub fn is_high_relevance(&self) -> bool {
        self.score >= 10
    }
}

/// Articles for one watched company, in report order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyNews {
    pub company: String,
    pub country: Country,
    pub items: Vec<NewsItem>,
}

/// Per-provider counts of newly collected articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub google: usize,
    pub naver: usize,
}

impl CollectionStats {
    pub fn total(&self) -> usize {
        self.google + self.naver
    }
}
