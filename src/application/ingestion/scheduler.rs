use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::application::ingestion::orchestrator::{DonationIngestor, RunOutcome};
use crate::utils::logging;

/// Calls [`DonationIngestor::run_once`] on a fixed cadence.
///
/// Failed passes are logged and retried on the next tick; the watermark makes
/// the retry pick up where the last successful pass stopped.
#[derive(Debug)]
pub struct IngestionScheduler {
    ingestor: Arc<DonationIngestor>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl IngestionScheduler {
    pub fn new(ingestor: Arc<DonationIngestor>, interval: Duration) -> Self {
        Self {
            ingestor,
            interval,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawn the polling loop. The first pass runs one interval after start,
    /// since startup has just scraped (or chosen not to).
    pub fn start(&mut self) {
        if self.is_running() {
            logging::log_warning("[scheduler] Already running");
            return;
        }

        let ingestor = Arc::clone(&self.ingestor);
        let period = self.interval.max(Duration::from_millis(1));

        logging::log_info(&format!(
            "[scheduler] Starting scheduled scrapes every {}s",
            period.as_secs()
        ));

        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match ingestor.run_once().await {
                    Ok(RunOutcome::Completed(_)) | Ok(RunOutcome::Skipped) => {}
                    Err(e) => logging::log_error(&format!(
                        "[scheduler] Scheduled scrape failed, will retry next tick: {}",
                        e
                    )),
                }
            }
        }));
    }

    /// Stop the polling loop; a pass in progress is abandoned
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            logging::log_info("[scheduler] Stopped");
        }
    }
}
