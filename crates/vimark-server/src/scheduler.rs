//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring daily trend scan.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::workflow::{run_daily_content_generation, WorkflowRequest};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<vimark_core::AppConfig>,
    catalog: Arc<vimark_content::CatalogIndex>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_daily_scan_job(&scheduler, pool, config, catalog).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the daily content-generation job.
///
/// Runs every day at 08:00 UTC (`0 0 8 * * *`), i.e. 15:00 in Vietnam, well
/// before the evening posting window.
async fn register_daily_scan_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<vimark_core::AppConfig>,
    catalog: Arc<vimark_content::CatalogIndex>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 8 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);
        let catalog = Arc::clone(&catalog);

        Box::pin(async move {
            tracing::info!("scheduler: starting daily trend scan");
            match run_daily_content_generation(&pool, &config, &catalog, &WorkflowRequest::default())
                .await
            {
                Ok(report) => {
                    tracing::info!(
                        workflow_id = %report.workflow_id,
                        briefs_created = report.briefs_created,
                        "scheduler: daily trend scan complete"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: daily trend scan failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
