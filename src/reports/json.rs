use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::AppError;
use crate::models::{CollectionStats, CompanyNews, IndicatorSnapshot, NewsItem, SelectionResult};

#[derive(Debug, Serialize)]
pub struct DailySnapshotFile<'a> {
    pub timestamp: String,
    pub total_stocks: usize,
    pub stocks: &'a [IndicatorSnapshot],
}

#[derive(Debug, Serialize)]
pub struct NewsDataFile<'a> {
    pub timestamp: String,
    pub stats: CollectionStats,
    pub news_by_company: BTreeMap<&'a str, &'a [NewsItem]>,
}

impl<'a> NewsDataFile<'a> {
    pub fn new(timestamp: String, stats: CollectionStats, companies: &'a [CompanyNews]) -> Self {
        Self {
            timestamp,
            stats,
            news_by_company: companies
                .iter()
                .map(|c| (c.company.as_str(), c.items.as_slice()))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectionFile<'a> {
    pub timestamp: String,
    pub total_selected: usize,
    pub selected_stocks: &'a [SelectionResult],
    pub all_candidates: &'a [SelectionResult],
}

/// Pretty-printed UTF-8 JSON; creates the parent directory if needed.
pub fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(payload)?;
    super::write_text(path, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Country;

    #[test]
    fn test_news_file_groups_by_company() {
        let companies = vec![
            CompanyNews {
                company: "SK hynix".to_string(),
                country: Country::KR,
                items: vec![],
            },
            CompanyNews {
                company: "NVIDIA".to_string(),
                country: Country::US,
                items: vec![],
            },
        ];
        let file = NewsDataFile::new(
            "2024-10-15 07:00".to_string(),
            CollectionStats { google: 2, naver: 1 },
            &companies,
        );
        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(value["stats"]["google"], 2);
        let keys: Vec<&String> = value["news_by_company"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["NVIDIA", "SK hynix"]);
    }

    #[test]
    fn test_write_json_creates_parent() {
        let root = std::env::temp_dir().join(format!("dcwatch-json-{}", uuid::Uuid::new_v4()));
        let path = root.join("market_data").join("datacenter_stocks_20241015.json");
        let file = DailySnapshotFile {
            timestamp: "2024-10-15 07:30".to_string(),
            total_stocks: 0,
            stocks: &[],
        };
        write_json(&path, &file).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"total_stocks\": 0"));
        std::fs::remove_dir_all(&root).ok();
    }
}
