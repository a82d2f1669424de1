use crate::models::KeywordTaxonomy;

pub const HIGH_SCORE: u32 = 10;
pub const MEDIUM_SCORE: u32 = 6;
/// Floor for titles matching nothing, so every item stays sortable.
pub const BASE_SCORE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relevance {
    pub score: u32,
    pub matched_keywords: Vec<String>,
}

/// Scores a title against the taxonomy. The first high-tier hit (in taxonomy
/// order) wins; otherwise the first medium-tier hit; otherwise `BASE_SCORE`.
/// Matching is a case-insensitive substring test.
pub fn score_title(title: &str, taxonomy: &KeywordTaxonomy) -> Relevance {
    let text = title.to_lowercase();
    let first_hit = |keywords: &[String]| {
        keywords
            .iter()
            .find(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
            .cloned()
    };

    if let Some(keyword) = first_hit(&taxonomy.high) {
        return Relevance {
            score: HIGH_SCORE,
            matched_keywords: vec![keyword],
        };
    }

    if let Some(keyword) = first_hit(&taxonomy.medium) {
        return Relevance {
            score: MEDIUM_SCORE,
            matched_keywords: vec![keyword],
        };
    }

    Relevance {
        score: BASE_SCORE,
        matched_keywords: Vec::new(),
    }
}
