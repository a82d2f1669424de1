//! Daily indicator report for the tracked ticker list.
//!
//! Fetches a year of daily history per ticker, builds the indicator snapshot,
//! writes the JSON/XLSX/Markdown reports and posts a short summary. Tickers
//! without usable history are skipped and counted as failed.

use chrono::Local;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::price_provider::history_or_empty;
use crate::jobs::{prepare_dirs, record_write};
use crate::reports::json::{write_json, DailySnapshotFile};
use crate::reports::{date_stamp, markdown, spreadsheet, timestamp, write_text};
use crate::services::indicators::build_snapshot;
use crate::services::job_scheduler_service::{JobContext, JobResult};
use crate::services::rate_limiter::RateLimiter;
use crate::services::report_assembly::{daily_summary, DailyDigest, SavedFiles};

pub async fn run(ctx: JobContext) -> Result<JobResult, AppError> {
    info!("📈 Collecting daily indicator data...");
    prepare_dirs(&ctx);

    let now = Local::now();
    let date = date_stamp(&now);
    let generated = timestamp(&now);

    let limiter = RateLimiter::new(ctx.config.delays.price_history);
    let stocks = &ctx.universe.daily_stocks;
    let mut snapshots = Vec::with_capacity(stocks.len());
    let mut failed = 0;

    for (idx, stock) in stocks.iter().enumerate() {
        limiter.acquire().await;
        let series = history_or_empty(ctx.price_provider.as_ref(), &stock.ticker).await;

        match build_snapshot(stock, &series) {
            Ok(snapshot) => {
                info!("[{}/{}] {} ✅", idx + 1, stocks.len(), stock.name);
                snapshots.push(snapshot);
            }
            Err(e) => {
                warn!("[{}/{}] {} ❌ {}", idx + 1, stocks.len(), stock.name, e);
                failed += 1;
            }
        }
    }

    info!("Collected {}/{} stocks", snapshots.len(), stocks.len());

    let digest = DailyDigest::build(&snapshots);
    let config = &ctx.config;

    let json_path = config
        .market_data_dir
        .join(format!("datacenter_stocks_{}.json", date));
    let payload = DailySnapshotFile {
        timestamp: generated.clone(),
        total_stocks: snapshots.len(),
        stocks: &snapshots,
    };
    let json = record_write("JSON", json_path.clone(), write_json(&json_path, &payload));

    let excel_path = config
        .analysis_dir
        .join(format!("datacenter_analysis_{}.xlsx", date));
    let excel = record_write(
        "Excel",
        excel_path.clone(),
        spreadsheet::write_workbook(&excel_path, &spreadsheet::daily_sheets(&digest)),
    );

    let md_path = config
        .analysis_dir
        .join(format!("datacenter_report_{}.md", date));
    let markdown = record_write(
        "Markdown",
        md_path.clone(),
        write_text(&md_path, &markdown::daily_report(&digest, &generated)),
    );

    let files = SavedFiles {
        json,
        excel,
        markdown,
    };
    if ctx.notifier.send_text(&daily_summary(&digest, &files)).await {
        info!("📱 Summary sent");
    }

    Ok(JobResult {
        items_processed: snapshots.len() as i32,
        items_failed: failed,
    })
}
