//! The three automation jobs.
//!
//! - `news_monitor_job` - collects, scores, translates and reports watch-list news
//! - `daily_report_job` - indicator snapshot of the daily ticker list
//! - `stock_selection_job` - monthly per-sub-sector stock selection
//!
//! Each job runs sequentially, tolerates every collaborator failure and
//! always finishes with whatever reports it could write plus a summary message.

pub mod daily_report_job;
pub mod news_monitor_job;
pub mod stock_selection_job;

use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info};

use crate::errors::AppError;
use crate::services::job_scheduler_service::{JobContext, JobResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    News,
    Daily,
    Selection,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [JobKind::News, JobKind::Daily, JobKind::Selection];

    pub fn name(&self) -> &'static str {
        match self {
            JobKind::News => "news_monitor",
            JobKind::Daily => "daily_report",
            JobKind::Selection => "stock_selection",
        }
    }

    /// Cron expression (sec min hour day month weekday), UTC.
    pub fn schedule(&self, test_mode: bool) -> &'static str {
        if test_mode {
            return "0 */1 * * * *";
        }
        match self {
            JobKind::News => "0 0 7 * * *",
            JobKind::Daily => "0 30 7 * * MON-FRI",
            JobKind::Selection => "0 0 8 1 * *",
        }
    }

    pub fn schedule_description(&self, test_mode: bool) -> &'static str {
        if test_mode {
            return "Every minute (TEST MODE)";
        }
        match self {
            JobKind::News => "Daily at 7:00 AM",
            JobKind::Daily => "Weekdays at 7:30 AM",
            JobKind::Selection => "Monthly on the 1st at 8:00 AM",
        }
    }

    pub async fn run(&self, ctx: JobContext) -> Result<JobResult, AppError> {
        match self {
            JobKind::News => news_monitor_job::run(ctx).await,
            JobKind::Daily => daily_report_job::run(ctx).await,
            JobKind::Selection => stock_selection_job::run(ctx).await,
        }
    }
}

impl FromStr for JobKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "news" | "news_monitor" => Ok(JobKind::News),
            "daily" | "daily_report" => Ok(JobKind::Daily),
            "selection" | "stock_selection" => Ok(JobKind::Selection),
            other => Err(AppError::Config(format!(
                "Unknown job '{}'. Expected news, daily, selection or schedule",
                other
            ))),
        }
    }
}

/// Logs a writer outcome and keeps the path only when the write succeeded.
pub(crate) fn record_write(label: &str, path: PathBuf, result: Result<(), AppError>) -> Option<PathBuf> {
    match result {
        Ok(()) => {
            info!("✅ {}: {}", label, path.display());
            Some(path)
        }
        Err(e) => {
            error!("❌ Failed to write {} {}: {}", label, path.display(), e);
            None
        }
    }
}

/// Creates the output directories; a failure is logged and the job carries on.
pub(crate) fn prepare_dirs(ctx: &JobContext) {
    if let Err(e) = ctx.config.ensure_dirs() {
        error!("Could not create output directories: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_kind_parsing() {
        assert_eq!("news".parse::<JobKind>().unwrap(), JobKind::News);
        assert_eq!("Daily".parse::<JobKind>().unwrap(), JobKind::Daily);
        assert_eq!("stock_selection".parse::<JobKind>().unwrap(), JobKind::Selection);
        assert!("backfill".parse::<JobKind>().is_err());
    }

    #[test]
    fn test_schedules() {
        assert_eq!(JobKind::Daily.schedule(false), "0 30 7 * * MON-FRI");
        assert_eq!(JobKind::Selection.schedule(false), "0 0 8 1 * *");
        for kind in JobKind::ALL {
            assert_eq!(kind.schedule(true), "0 */1 * * * *");
        }
    }
}
