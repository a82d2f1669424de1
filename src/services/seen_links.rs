use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::errors::AppError;

pub const HISTORY_FILE_NAME: &str = "news_history.json";

#[derive(Debug, Serialize, Deserialize)]
struct SeenLinksFile {
    #[serde(default)]
    last_updated: String,
    seen_links: Vec<String>,
}

/// Links already reported in earlier runs, persisted as a flat JSON file.
///
/// Grows without eviction. A link present here is never emitted as new.
#[derive(Debug, Clone)]
pub struct SeenLinkStore {
    path: PathBuf,
    links: HashSet<String>,
}

impl SeenLinkStore {
    /// Loads the store. A missing or unreadable file yields an empty set.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let links = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<SeenLinksFile>(&raw) {
                Ok(file) => file.seen_links.into_iter().collect(),
                Err(e) => {
                    warn!("Ignoring corrupt seen-link file {}: {}", path.display(), e);
                    HashSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => {
                warn!("Could not read seen-link file {}: {}", path.display(), e);
                HashSet::new()
            }
        };

        info!("Loaded {} seen links from {}", links.len(), path.display());
        Self { path, links }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::load(dir.join(HISTORY_FILE_NAME))
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Returns `true` when the link was not seen before.
    pub fn add(&mut self, link: impl Into<String>) -> bool {
        self.links.insert(link.into())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every link to disk, sorted for stable diffs.
    pub fn flush(&self) -> Result<(), AppError> {
        let mut seen_links: Vec<String> = self.links.iter().cloned().collect();
        seen_links.sort();

        let file = SeenLinksFile {
            last_updated: Utc::now().to_rfc3339(),
            seen_links,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}
