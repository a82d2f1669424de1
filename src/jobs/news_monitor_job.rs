//! News monitor.
//!
//! Phases: collect (per watched company, deduplicated against earlier runs),
//! rank (top articles per company), translate (US articles only), store
//! (JSON/XLSX/Markdown/DOCX) and notify (summary text plus the DOCX file).

use chrono::{Local, Utc};
use tracing::{error, info};

use crate::errors::AppError;
use crate::jobs::{prepare_dirs, record_write};
use crate::reports::docx::{news_document, write_docx};
use crate::reports::json::{write_json, NewsDataFile};
use crate::reports::{date_stamp, markdown, spreadsheet, timestamp, write_text};
use crate::services::job_scheduler_service::{JobContext, JobResult};
use crate::services::news_service::{
    article_count, translate_companies, NewsService, TOP_PER_COMPANY,
};
use crate::services::report_assembly::{news_summary, SavedFiles};
use crate::services::seen_links::SeenLinkStore;
use crate::services::translation_service::TranslationService;

const DOCX_CAPTION: &str = "📰 뉴스 리포트 (요약)";

pub async fn run(ctx: JobContext) -> Result<JobResult, AppError> {
    info!("📰 Starting news collection...");
    prepare_dirs(&ctx);

    let now = Local::now();
    let date = date_stamp(&now);
    let generated = timestamp(&now);
    let config = &ctx.config;

    let mut seen = SeenLinkStore::in_dir(&config.market_data_dir);
    info!("Seen links: {}", seen.len());

    let service = NewsService::new(ctx.google_news.clone(), ctx.naver_news.clone(), &config.delays);
    let collection = service
        .collect(&ctx.universe, &mut seen, now.with_timezone(&Utc))
        .await;

    if let Err(e) = seen.flush() {
        error!("Failed to persist seen links to {}: {}", seen.path().display(), e);
    }

    let stats = collection.stats;
    info!(
        "Collected Google: {}, Naver: {}, total: {}",
        stats.google,
        stats.naver,
        stats.total()
    );

    let mut companies = collection.top_per_company(TOP_PER_COMPANY);
    let final_count = article_count(&companies);
    info!("Final (top {} each): {}", TOP_PER_COMPANY, final_count);

    let translator = TranslationService::new(ctx.translator.clone(), config.delays.translation);
    let translated = translate_companies(&mut companies, &translator).await;
    if translator.is_enabled() {
        info!("Translated: {} articles", translated);
    } else {
        info!("Translation disabled");
    }

    let json_path = config.market_data_dir.join(format!("news_data_{}.json", date));
    let payload = NewsDataFile::new(generated.clone(), stats, &companies);
    let json = record_write("JSON", json_path.clone(), write_json(&json_path, &payload));

    let excel = match spreadsheet::news_sheet(&companies) {
        Some(sheet) => {
            let excel_path = config.analysis_dir.join(format!("news_analysis_{}.xlsx", date));
            record_write(
                "Excel",
                excel_path.clone(),
                spreadsheet::write_workbook(&excel_path, &[sheet]),
            )
        }
        None => None,
    };

    let md_path = config.analysis_dir.join(format!("news_report_{}.md", date));
    let markdown = record_write(
        "Markdown",
        md_path.clone(),
        write_text(&md_path, &markdown::news_report(&companies, &stats, &generated)),
    );

    let docx_path = config.output_dir.join(format!("news_report_{}.docx", date));
    let docx = record_write(
        "DOCX",
        docx_path.clone(),
        write_docx(&docx_path, news_document(&companies, &generated)),
    );

    let files = SavedFiles {
        json,
        excel,
        markdown,
    };
    if ctx.notifier.send_text(&news_summary(final_count, &stats, &files)).await {
        info!("📱 Summary sent");
    }
    if let Some(docx_path) = docx {
        if ctx.notifier.send_file(&docx_path, DOCX_CAPTION).await {
            info!("📱 DOCX sent");
        }
    }

    Ok(JobResult {
        items_processed: final_count as i32,
        items_failed: 0,
    })
}
