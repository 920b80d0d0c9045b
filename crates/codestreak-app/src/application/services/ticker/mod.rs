mod health_check;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use codestreak_domain::shared::DomainError;

use super::ReminderScheduler;
use crate::application::ResultExt;

/// Fires at second 0 of every minute
const TICK_SCHEDULE: &str = "0 * * * * *";

/// In-process trigger for [`ReminderScheduler::run_tick`].
///
/// Optional: deployments that drive ticks through the cron endpoint can
/// leave it stopped. Both paths share the tick marker, so running both
/// never processes a minute twice.
pub struct ReminderTicker {
    scheduler: Arc<ReminderScheduler>,
    job_scheduler: Arc<Mutex<Option<JobScheduler>>>,
    /// Health check task handle
    health_check_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
    started_at: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl ReminderTicker {
    pub fn new(scheduler: Arc<ReminderScheduler>) -> Self {
        Self {
            scheduler,
            job_scheduler: Arc::new(Mutex::new(None)),
            health_check_handle: Arc::new(Mutex::new(None)),
            started_at: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn start(&self) -> Result<(), DomainError> {
        let mut job_scheduler = self.job_scheduler.lock().await;
        if job_scheduler.is_some() {
            warn!("⚠️  Reminder ticker already running");
            return Ok(());
        }

        let sched = JobScheduler::new().await.to_infra_err()?;

        let scheduler = Arc::clone(&self.scheduler);
        let job = Job::new_async(TICK_SCHEDULE, move |_uuid, _lock| {
            let scheduler = Arc::clone(&scheduler);
            Box::pin(async move {
                if let Err(e) = scheduler.run_tick().await {
                    error!("❌ [REMINDER TICK] Tick failed: {}", e);
                }
            })
        })
        .to_infra_err()?;

        sched.add(job).await.to_infra_err()?;
        sched.start().await.to_infra_err()?;

        *job_scheduler = Some(sched);
        drop(job_scheduler);

        *self.started_at.lock().await = Some(Utc::now());
        self.start_health_check_task().await;

        info!("✅ Reminder ticker started (schedule: {})", TICK_SCHEDULE);
        Ok(())
    }

    pub async fn stop(&self) -> Result<(), DomainError> {
        if let Some(handle) = self.health_check_handle.lock().await.take() {
            handle.abort();
        }

        let Some(mut sched) = self.job_scheduler.lock().await.take() else {
            return Ok(());
        };
        sched.shutdown().await.to_infra_err()?;
        *self.started_at.lock().await = None;

        info!("Reminder ticker stopped");
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.job_scheduler.lock().await.is_some()
    }
}
