use anyhow::Context;
use dcwatch::config::AppConfig;
use dcwatch::jobs::JobKind;
use dcwatch::logging::{init_logging, LoggingConfig};
use dcwatch::services::job_scheduler_service::{
    execute_job_with_tracking, JobContext, JobSchedulerService,
};

const SCHEDULE_MODE: &str = "schedule";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Job from the first argument, else DCWATCH_JOB, else the long-running scheduler
    let mode = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DCWATCH_JOB").ok())
        .unwrap_or_else(|| SCHEDULE_MODE.to_string());

    // Initialize logging FIRST
    init_logging(&LoggingConfig::from_env(mode.trim())).context("Failed to initialize logging")?;

    let config = AppConfig::from_env();
    config.log_summary();

    let context = JobContext::from_config(config);

    if mode.trim().eq_ignore_ascii_case(SCHEDULE_MODE) {
        let mut scheduler = JobSchedulerService::new(context).await?;
        scheduler.start().await?;

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;
        scheduler.stop().await?;
        return Ok(());
    }

    let kind: JobKind = mode.parse()?;
    // A failed job is logged by the tracker; the process still exits cleanly.
    execute_job_with_tracking(kind, context).await;
    tracing::info!("🏁 {} finished", kind.name());
    Ok(())
}
