use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CourtesyDelays;
use crate::external::news_provider::NewsProvider;
use crate::models::{
    CollectionStats, CompanyNews, Country, KeywordTaxonomy, NewsItem, NewsSource, RawArticle,
    Universe, WatchedCompany,
};
use crate::services::rate_limiter::RateLimiter;
use crate::services::relevance::score_title;
use crate::services::seen_links::SeenLinkStore;
use crate::services::translation_service::{
    TranslationService, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};

/// Only articles published within this many days count as new.
pub const RECENCY_DAYS: i64 = 7;
pub const MIN_TITLE_CHARS: usize = 10;
/// Articles kept per company after ranking.
pub const TOP_PER_COMPANY: usize = 2;
/// US companies are searched with at most this many of their terms.
pub const GOOGLE_TERMS_PER_COMPANY: usize = 2;

/// Applies the recency, title-length and dedup filters to one search result,
/// registering every accepted link in `seen`. Articles without a publish
/// date are stamped with `now`.
pub fn accept_new_articles(
    raw: Vec<RawArticle>,
    seen: &mut SeenLinkStore,
    now: DateTime<Utc>,
) -> Vec<RawArticle> {
    let cutoff = now - Duration::days(RECENCY_DAYS);
    let mut accepted = Vec::new();

    for mut article in raw {
        article.title = article.title.trim().to_string();
        article.link = article.link.trim().to_string();

        if article.link.is_empty() || article.title.chars().count() < MIN_TITLE_CHARS {
            continue;
        }
        if seen.contains(&article.link) {
            continue;
        }

        let published = article.published_at.unwrap_or(now);
        if published < cutoff {
            continue;
        }
        article.published_at = Some(published);

        seen.add(article.link.clone());
        accepted.push(article);
    }

    accepted
}

/// One search against one provider. Provider errors are logged and yield nothing.
pub async fn fetch_new_articles(
    provider: &dyn NewsProvider,
    query: &str,
    seen: &mut SeenLinkStore,
    now: DateTime<Utc>,
) -> Vec<RawArticle> {
    if !provider.is_enabled() {
        return Vec::new();
    }

    match provider.search(query).await {
        Ok(raw) => accept_new_articles(raw, seen, now),
        Err(e) => {
            warn!("{} search failed for '{}': {}", provider.source(), query, e);
            Vec::new()
        }
    }
}

pub fn score_article(
    article: RawArticle,
    company: &WatchedCompany,
    taxonomy: &KeywordTaxonomy,
    now: DateTime<Utc>,
) -> NewsItem {
    let relevance = score_title(&article.title, taxonomy);
    NewsItem {
        title: article.title,
        description: article.description,
        link: article.link,
        publisher: article.publisher,
        source: article.source,
        published_at: article.published_at.unwrap_or(now),
        score: relevance.score,
        matched_keywords: relevance.matched_keywords,
        company: company.name.clone(),
        country: company.country,
        translated_title: None,
        translated_description: None,
    }
}

/// Highest `(score, published_at)` first; equal keys keep collection order.
pub fn top_items(mut items: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    items.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    items.truncate(limit);
    items
}

/// Result of one collection pass, before ranking.
#[derive(Debug, Clone, Default)]
pub struct NewsCollection {
    pub companies: Vec<CompanyNews>,
    pub stats: CollectionStats,
}

impl NewsCollection {
    /// Top articles per company; companies without news are dropped.
    pub fn top_per_company(self, limit: usize) -> Vec<CompanyNews> {
        self.companies
            .into_iter()
            .filter(|c| !c.items.is_empty())
            .map(|c| CompanyNews {
                items: top_items(c.items, limit),
                ..c
            })
            .collect()
    }
}

pub fn article_count(companies: &[CompanyNews]) -> usize {
    companies.iter().map(|c| c.items.len()).sum()
}

/// Collects news for the watch list: Google News for US companies, Naver for
/// Korean ones, one query at a time.
pub struct NewsService {
    google: Arc<dyn NewsProvider>,
    naver: Arc<dyn NewsProvider>,
    google_limiter: RateLimiter,
    naver_limiter: RateLimiter,
}

impl NewsService {
    pub fn new(
        google: Arc<dyn NewsProvider>,
        naver: Arc<dyn NewsProvider>,
        delays: &CourtesyDelays,
    ) -> Self {
        Self {
            google,
            naver,
            google_limiter: RateLimiter::new(delays.google_news),
            naver_limiter: RateLimiter::new(delays.naver_news),
        }
    }

    async fn company_articles(
        &self,
        company: &WatchedCompany,
        seen: &mut SeenLinkStore,
        now: DateTime<Utc>,
    ) -> Vec<RawArticle> {
        let (provider, limiter, terms) = match company.country {
            Country::US => (
                self.google.as_ref(),
                &self.google_limiter,
                &company.search_terms[..company.search_terms.len().min(GOOGLE_TERMS_PER_COMPANY)],
            ),
            Country::KR => (self.naver.as_ref(), &self.naver_limiter, &company.search_terms[..]),
        };

        let fallback = [company.name.clone()];
        let terms = if terms.is_empty() { &fallback[..] } else { terms };

        let mut articles = Vec::new();
        for term in terms {
            if !provider.is_enabled() {
                break;
            }
            limiter.acquire().await;
            let found = fetch_new_articles(provider, term, seen, now).await;
            info!("    [{}] {} articles", term, found.len());
            articles.extend(found);
        }
        articles
    }

    pub async fn collect(
        &self,
        universe: &Universe,
        seen: &mut SeenLinkStore,
        now: DateTime<Utc>,
    ) -> NewsCollection {
        let mut collection = NewsCollection::default();
        let total = universe.watch_list.len();

        for (idx, company) in universe.watch_list.iter().enumerate() {
            info!("[{}/{}] {} ({})", idx + 1, total, company.name, company.country);

            let taxonomy = universe.keywords_for(company.country);
            let articles = self.company_articles(company, seen, now).await;

            for article in &articles {
                match article.source {
                    NewsSource::GoogleNews => collection.stats.google += 1,
                    NewsSource::Naver => collection.stats.naver += 1,
                }
            }

            let items: Vec<NewsItem> = articles
                .into_iter()
                .map(|a| score_article(a, company, taxonomy, now))
                .collect();

            collection.companies.push(CompanyNews {
                company: company.name.clone(),
                country: company.country,
                items,
            });
        }

        collection
    }
}

/// Fills the translation fields. US articles go through the translator;
/// Korean articles, and everything when translation is disabled, copy their
/// original text. Returns the number of translated articles.
pub async fn translate_companies(
    companies: &mut [CompanyNews],
    translator: &TranslationService,
) -> usize {
    let limiter = RateLimiter::new(translator.delay());
    let enabled = translator.is_enabled();
    let mut translated = 0;

    for company in companies.iter_mut() {
        for item in company.items.iter_mut() {
            if enabled && item.country == Country::US {
                limiter.acquire().await;
                item.translated_title = Some(translator.translate(&item.title, TITLE_MAX_CHARS).await);
                if !item.description.is_empty() {
                    item.translated_description =
                        Some(translator.translate(&item.description, DESCRIPTION_MAX_CHARS).await);
                }
                translated += 1;
            } else {
                item.translated_title = Some(item.title.clone());
                item.translated_description = Some(item.description.clone());
            }
        }
    }

    translated
}
