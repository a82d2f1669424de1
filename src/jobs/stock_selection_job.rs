//! Monthly stock selection.
//!
//! Scores every candidate of every sub-sector pool and selects the best one
//! per pool. Candidates with less than six months of history are excluded
//! before their market cap is even requested.

use chrono::Local;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::price_provider::{history_or_empty, market_cap_or_zero};
use crate::jobs::{prepare_dirs, record_write};
use crate::reports::json::{write_json, SelectionFile};
use crate::reports::{date_stamp, markdown, spreadsheet, timestamp, write_text};
use crate::services::job_scheduler_service::{JobContext, JobResult};
use crate::services::rate_limiter::RateLimiter;
use crate::services::report_assembly::{selection_summary, SavedFiles, SelectionDigest};
use crate::services::selection_scorer::{
    market_caps_unavailable, rank_sector, score_candidate, selection_metrics,
    MIN_SELECTION_SAMPLES,
};

pub async fn run(ctx: JobContext) -> Result<JobResult, AppError> {
    info!("🔍 Starting stock selection...");
    prepare_dirs(&ctx);

    let now = Local::now();
    let date = date_stamp(&now);
    let generated = timestamp(&now);

    let limiter = RateLimiter::new(ctx.config.delays.price_history);
    let provider = ctx.price_provider.as_ref();
    let mut sectors = Vec::with_capacity(ctx.universe.candidate_pools.len());
    let mut processed = 0;
    let mut failed = 0;

    for pool in &ctx.universe.candidate_pools {
        info!("📂 {} ({} candidates)", pool.sub_sector, pool.candidates.len());
        let mut scored = Vec::with_capacity(pool.candidates.len());

        for candidate in &pool.candidates {
            limiter.acquire().await;
            let series = history_or_empty(provider, &candidate.ticker).await;
            if series.len() < MIN_SELECTION_SAMPLES {
                warn!(
                    "  {} ❌ insufficient data ({} samples)",
                    candidate.name,
                    series.len()
                );
                failed += 1;
                continue;
            }

            limiter.acquire().await;
            let market_cap = market_cap_or_zero(provider, &candidate.ticker).await;
            match selection_metrics(&series, market_cap) {
                Ok(metrics) => {
                    let result = score_candidate(candidate, pool, &metrics);
                    info!("  {} ✅ {:.1} pts", candidate.name, result.score);
                    scored.push(result);
                    processed += 1;
                }
                Err(e) => {
                    warn!("  {} ❌ {}", candidate.name, e);
                    failed += 1;
                }
            }
        }

        let sector = rank_sector(&pool.sub_sector, scored);
        match &sector.selected {
            Some(best) => info!(
                "  ⭐ Selected: {} ({:.1} pts, ${:.1}B, 3M {:+.2}%)",
                best.name,
                best.score,
                best.market_cap / 1e9,
                best.return_3m
            ),
            None => warn!("  ⚠️ No eligible candidate in {}", pool.sub_sector),
        }
        sectors.push(sector);
    }

    if market_caps_unavailable(&sectors) {
        warn!("⚠️ Market cap unavailable for every candidate; all score the lowest market-cap bucket");
    }

    let digest = SelectionDigest::build(&sectors);
    info!("✅ {} stocks selected", digest.selected.len());

    let config = &ctx.config;

    let json_path = config
        .market_data_dir
        .join(format!("stock_selection_{}.json", date));
    let payload = SelectionFile {
        timestamp: generated.clone(),
        total_selected: digest.selected.len(),
        selected_stocks: &digest.selected,
        all_candidates: &digest.all_candidates,
    };
    let json = record_write("JSON", json_path.clone(), write_json(&json_path, &payload));

    let excel_path = config
        .analysis_dir
        .join(format!("stock_selection_{}.xlsx", date));
    let excel = record_write(
        "Excel",
        excel_path.clone(),
        spreadsheet::write_workbook(&excel_path, &spreadsheet::selection_sheets(&digest)),
    );

    let md_path = config
        .analysis_dir
        .join(format!("stock_selection_report_{}.md", date));
    let markdown = record_write(
        "Markdown",
        md_path.clone(),
        write_text(&md_path, &markdown::selection_report(&digest, &generated)),
    );

    let files = SavedFiles {
        json,
        excel,
        markdown,
    };
    if ctx.notifier.send_text(&selection_summary(&digest, &files)).await {
        info!("📱 Summary sent");
    }

    Ok(JobResult {
        items_processed: processed,
        items_failed: failed,
    })
}
