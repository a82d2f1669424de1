use crate::config::AppConfig;
use crate::errors::AppError;
use crate::external::google_news::GoogleNewsProvider;
use crate::external::naver_news::NaverNewsProvider;
use crate::external::news_provider::NewsProvider;
use crate::external::papago::PapagoTranslator;
use crate::external::price_provider::PriceProvider;
use crate::external::translator::Translator;
use crate::external::yahoo::YahooFinanceProvider;
use crate::jobs::JobKind;
use crate::models::Universe;
use crate::services::notification_service::{notifier_from_config, Notifier};
use chrono::Utc;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};
use uuid::Uuid;

// Context passed to job functions. Everything in it is read-only.
#[derive(Clone)]
pub struct JobContext {
    pub config: Arc<AppConfig>,
    pub universe: Arc<Universe>,
    pub price_provider: Arc<dyn PriceProvider>,
    pub google_news: Arc<dyn NewsProvider>,
    pub naver_news: Arc<dyn NewsProvider>,
    pub translator: Arc<dyn Translator>,
    pub notifier: Arc<dyn Notifier>,
}

impl JobContext {
    /// Wires the production collaborators. Missing credentials disable the
    /// matching feature instead of failing.
    pub fn from_config(config: AppConfig) -> Self {
        let universe = config.load_universe();
        let timeout = config.request_timeout;

        Self {
            price_provider: Arc::new(YahooFinanceProvider::new(timeout)),
            google_news: Arc::new(GoogleNewsProvider::new(timeout)),
            naver_news: Arc::new(NaverNewsProvider::new(config.naver.clone(), timeout)),
            translator: Arc::new(PapagoTranslator::new(config.naver.clone(), timeout)),
            notifier: notifier_from_config(&config),
            universe: Arc::new(universe),
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobResult {
    pub items_processed: i32,
    pub items_failed: i32,
}

pub struct JobSchedulerService {
    scheduler: JobScheduler,
    context: JobContext,
}

impl JobSchedulerService {
    pub async fn new(context: JobContext) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, context })
    }

    /// Start all scheduled jobs
    pub async fn start(&mut self) -> Result<(), AppError> {
        info!("🚀 Starting job scheduler...");

        let test_mode = self.context.config.scheduler_test_mode;
        if test_mode {
            info!("⚠️  JOB SCHEDULER IN TEST MODE - Jobs will run every minute!");
        }

        for kind in JobKind::ALL {
            self.schedule_job(kind, test_mode).await?;
        }

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;

        info!("✅ Job scheduler started successfully with {} jobs", JobKind::ALL.len());
        Ok(())
    }

    /// Stop the scheduler gracefully
    pub async fn stop(&mut self) -> Result<(), AppError> {
        info!("🛑 Stopping job scheduler...");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::External(format!("Failed to stop scheduler: {}", e)))?;
        info!("✅ Job scheduler stopped");
        Ok(())
    }

    async fn schedule_job(&mut self, kind: JobKind, test_mode: bool) -> Result<(), AppError> {
        let schedule = kind.schedule(test_mode);
        let description = kind.schedule_description(test_mode);
        let context = self.context.clone();

        let job = Job::new_async(schedule, move |_uuid, _l| {
            let context = context.clone();
            Box::pin(async move {
                execute_job_with_tracking(kind, context).await;
            })
        })
        .map_err(|e| AppError::External(format!("Failed to create job {}: {}", kind.name(), e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::External(format!("Failed to add job {}: {}", kind.name(), e)))?;

        info!("📅 Scheduled: {} - {} [cron: {}]", kind.name(), description, schedule);
        Ok(())
    }
}

/// Runs one job with start/finish logging, a run id and its duration.
/// Job errors are logged, never propagated.
pub async fn execute_job_with_tracking(kind: JobKind, context: JobContext) -> Option<JobResult> {
    let run_id = Uuid::new_v4();
    info!("🏃 Starting job: {} (run {})", kind.name(), run_id);
    let started_at = Utc::now();

    let result = kind.run(context).await;

    let duration_ms = (Utc::now() - started_at).num_milliseconds();

    match result {
        Ok(job_result) => {
            info!(
                "✅ Job completed: {} (run {}, processed: {}, failed: {}, duration: {}ms)",
                kind.name(),
                run_id,
                job_result.items_processed,
                job_result.items_failed,
                duration_ms
            );
            Some(job_result)
        }
        Err(e) => {
            error!(
                "❌ Job failed: {} (run {}, duration: {}ms) - {}",
                kind.name(),
                run_id,
                duration_ms,
                e
            );
            None
        }
    }
}
