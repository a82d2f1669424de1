//! Report writers. Each job renders its views here and writes them under the
//! configured output directories.

pub mod docx;
pub mod json;
pub mod markdown;
pub mod spreadsheet;

use chrono::{DateTime, Local};
use std::path::Path;

use crate::errors::AppError;

/// `YYYYMMDD`, used in every report file name.
pub fn date_stamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d").to_string()
}

/// Human-readable generation time shown inside reports.
pub fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M").to_string()
}

pub fn write_text(path: &Path, contents: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
