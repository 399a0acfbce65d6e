//! Periodic scheduler for reminder scans.
//!
//! Uses tokio-cron-scheduler to re-run the engine's scan on a fixed period
//! (hourly by default) for as long as the hosting session is alive, plus an
//! immediate scan on start. Non-empty due sets are delivered through a
//! channel; the presentation layer owns what happens next.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info};

use crate::error::{CurioError, CurioResult};
use crate::reminders::engine::ReminderEngine;
use crate::types::InventoryItem;

/// Channel for receiving due sets from scheduled scans.
pub type DueSetReceiver = mpsc::Receiver<Vec<InventoryItem>>;

/// Configuration for the periodic scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Seconds between scans (default: 3600, one hour).
    pub interval_secs: u64,
    /// Whether to scan immediately when the scheduler starts (default: true).
    pub run_on_start: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            run_on_start: true,
        }
    }
}

impl ScanConfig {
    /// Create config with a custom scan interval.
    pub fn with_interval(interval_secs: u64) -> Self {
        Self {
            interval_secs: interval_secs.max(1), // Minimum 1 second
            ..Default::default()
        }
    }

    /// Disable the immediate scan on start.
    pub fn without_initial_scan(mut self) -> Self {
        self.run_on_start = false;
        self
    }
}

/// Scheduler driving periodic reminder scans over a [`ReminderEngine`].
///
/// `start()` arms exactly one repeated job; item mutations never re-arm the
/// timer. `shutdown()` releases it deterministically so no recurring task
/// outlives the scheduler.
///
/// # Example
///
/// ```ignore
/// use curio_core::{ReminderEngine, ReminderScheduler, ScanConfig};
/// use std::sync::Arc;
///
/// # async fn example(store: Arc<dyn curio_core::ItemStore>) -> curio_core::CurioResult<()> {
/// let engine = Arc::new(ReminderEngine::new(store));
/// let (scheduler, mut due_rx) = ReminderScheduler::new(engine, ScanConfig::default()).await?;
/// scheduler.start().await?;
///
/// while let Some(due) = due_rx.recv().await {
///     // present the due items
/// }
/// # Ok(())
/// # }
/// ```
pub struct ReminderScheduler {
    scheduler: JobScheduler,
    engine: Arc<ReminderEngine>,
    config: ScanConfig,
    due_sender: mpsc::Sender<Vec<InventoryItem>>,
    running: RwLock<bool>,
}

impl ReminderScheduler {
    /// Create a new scheduler.
    ///
    /// Returns the scheduler and a receiver for due sets. Call `start()` to
    /// begin periodic scanning.
    pub async fn new(
        engine: Arc<ReminderEngine>,
        config: ScanConfig,
    ) -> CurioResult<(Self, DueSetReceiver)> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| CurioError::scheduler(format!("Failed to create scheduler: {}", e)))?;

        let (tx, rx) = mpsc::channel(16);

        Ok((
            Self {
                scheduler,
                engine,
                config,
                due_sender: tx,
                running: RwLock::new(false),
            },
            rx,
        ))
    }

    /// Create a scheduler with default configuration (hourly, scan on start).
    pub async fn with_defaults(engine: Arc<ReminderEngine>) -> CurioResult<(Self, DueSetReceiver)> {
        Self::new(engine, ScanConfig::default()).await
    }

    /// Get the scheduler configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Get the underlying engine.
    pub fn engine(&self) -> &Arc<ReminderEngine> {
        &self.engine
    }

    /// Check if the scheduler is running.
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Start periodic scanning. Idempotent: a second call while running
    /// arms nothing.
    pub async fn start(&self) -> CurioResult<()> {
        let mut running = self.running.write().await;
        if *running {
            return Ok(());
        }

        let engine = self.engine.clone();
        let sender = self.due_sender.clone();
        let job = Job::new_repeated_async(
            Duration::from_secs(self.config.interval_secs),
            move |_uuid, _lock| {
                let engine = engine.clone();
                let sender = sender.clone();
                Box::pin(async move {
                    scan_and_deliver(&engine, &sender).await;
                })
            },
        )
        .map_err(|e| CurioError::scheduler(format!("Failed to create scan job: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| CurioError::scheduler(format!("Failed to add scan job: {}", e)))?;

        if self.config.run_on_start {
            debug!("Running initial reminder scan on start");
            scan_and_deliver(&self.engine, &self.due_sender).await;
        }

        self.scheduler
            .start()
            .await
            .map_err(|e| CurioError::scheduler(format!("Failed to start scheduler: {}", e)))?;
        *running = true;

        info!(
            interval_secs = self.config.interval_secs,
            "Reminder scheduler started"
        );
        Ok(())
    }

    /// Stop the scheduler, releasing the periodic timer.
    pub async fn shutdown(&mut self) -> CurioResult<()> {
        let mut running = self.running.write().await;
        if *running {
            self.scheduler
                .shutdown()
                .await
                .map_err(|e| CurioError::scheduler(format!("Failed to shutdown scheduler: {}", e)))?;
            *running = false;
            info!("Reminder scheduler stopped");
        }
        Ok(())
    }
}

/// One scan cycle: load, evaluate, deliver if anything is due.
///
/// An unreadable store yields nothing this cycle; the next cycle retries.
async fn scan_and_deliver(
    engine: &ReminderEngine,
    sender: &mpsc::Sender<Vec<InventoryItem>>,
) {
    match engine.scan(Utc::now()).await {
        Ok(due) if !due.is_empty() => {
            debug!(due = due.len(), "Delivering due set");
            let _ = sender.send(due).await;
        }
        Ok(_) => {}
        Err(e) => {
            error!(error = %e, "Reminder scan failed; treating as empty cycle");
        }
    }
}
