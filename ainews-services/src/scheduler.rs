//! Ingestion Scheduler
//!
//! Background task that triggers an ingestion run at startup and then on a
//! fixed interval. A tick that lands while a run is still active is skipped.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::ingestion::{IngestionError, IngestionOrchestrator, RunSummary};

/// Default time between scheduled runs (6 hours)
pub const DEFAULT_INGEST_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Recurring trigger for ingestion runs
pub struct IngestionScheduler {
    orchestrator: Arc<IngestionOrchestrator>,
    interval: Duration,
}

impl IngestionScheduler {
    pub fn new(orchestrator: Arc<IngestionOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            // tokio intervals panic on a zero period
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the scheduling loop forever. The first run starts immediately.
    pub async fn start(self: Arc<Self>) {
        info!(
            "Starting ingestion scheduler with {}s interval",
            self.interval.as_secs()
        );

        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// Trigger one run, logging rather than propagating failures
    pub async fn tick(&self) -> Option<RunSummary> {
        match self.orchestrator.run().await {
            Ok(summary) => Some(summary),
            Err(IngestionError::RunInProgress) => {
                info!("Previous ingestion run still active, skipping scheduled run");
                None
            }
            Err(e) => {
                error!("Scheduled ingestion run failed: {}", e);
                None
            }
        }
    }
}
