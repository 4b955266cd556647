//! Daily trigger for one start time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::pipeline::{ReminderJob, RunOutcome};
use crate::schedule::StartTime;

/// Fires a job at a start time, then once per period.
pub struct DailyTrigger {
    time: StartTime,
    initial_delay: Duration,
    period: Duration,
    job: Arc<dyn ReminderJob>,
    shutdown: watch::Receiver<bool>,
}

impl DailyTrigger {
    /// Creates a trigger whose first firing is `initial_delay` from now.
    pub fn new(
        time: StartTime,
        initial_delay: Duration,
        period: Duration,
        job: Arc<dyn ReminderJob>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            time,
            initial_delay,
            period,
            job,
            shutdown,
        }
    }

    /// Run the trigger loop until shutdown signal.
    ///
    /// Each firing spawns an independent run; a slow or failing run never
    /// delays the next firing, and runs may overlap.
    pub async fn run(&mut self) {
        let mut ticker = interval_at(Instant::now() + self.initial_delay, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        debug!(
            time = %self.time,
            delay_secs = self.initial_delay.as_secs(),
            "starting trigger"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.fire();
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!(time = %self.time, "trigger received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!(time = %self.time, "trigger stopped");
    }

    fn fire(&self) {
        let job = Arc::clone(&self.job);
        let time = self.time;
        info!(time = %time, "Reminder run starting");

        tokio::spawn(async move {
            match job.run().await {
                Ok(RunOutcome::SkippedHoliday) => info!(time = %time, "Reminder run skipped"),
                Ok(RunOutcome::Delivered {
                    now_due,
                    overdue,
                    no_deadline,
                    mentioned,
                    attempts,
                }) => info!(
                    time = %time,
                    now_due,
                    overdue,
                    no_deadline,
                    mentioned,
                    attempts,
                    "Reminder run finished"
                ),
                Err(e) => error!(time = %time, error = %e, "Reminder run failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, RuntimeError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records when it ran; fails or hangs on request.
    struct RecordingJob {
        runs: Mutex<Vec<Instant>>,
        fail: bool,
        hang: bool,
    }

    impl RecordingJob {
        fn new() -> Self {
            Self {
                runs: Mutex::new(Vec::new()),
                fail: false,
                hang: false,
            }
        }

        fn runs(&self) -> Vec<Instant> {
            self.runs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReminderJob for RecordingJob {
        async fn run(&self) -> Result<RunOutcome> {
            self.runs.lock().unwrap().push(Instant::now());
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                return Err(RuntimeError::EmptyIterations);
            }
            Ok(RunOutcome::SkippedHoliday)
        }
    }

    const HOUR: Duration = Duration::from_secs(3600);
    const DAY: Duration = Duration::from_secs(86_400);

    fn spawn_trigger(job: Arc<RecordingJob>, delay: Duration) -> (watch::Sender<bool>, tokio::task::JoinHandle<()>) {
        let (tx, rx) = watch::channel(false);
        let time = StartTime::parse("9:30AM").unwrap();
        let handle = tokio::spawn(async move {
            DailyTrigger::new(time, delay, DAY, job, rx).run().await;
        });
        (tx, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay_then_daily() {
        let job = Arc::new(RecordingJob::new());
        let start = Instant::now();
        let (tx, handle) = spawn_trigger(Arc::clone(&job), 2 * HOUR);

        tokio::time::sleep(2 * HOUR - Duration::from_secs(1)).await;
        assert!(job.runs().is_empty());

        tokio::time::sleep(2 * DAY + Duration::from_secs(2)).await;
        let runs = job.runs();
        assert_eq!(runs, vec![start + 2 * HOUR, start + 2 * HOUR + DAY, start + 2 * HOUR + 2 * DAY]);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_does_not_stop_trigger() {
        let job = Arc::new(RecordingJob {
            fail: true,
            ..RecordingJob::new()
        });
        let (tx, handle) = spawn_trigger(Arc::clone(&job), Duration::ZERO);

        tokio::time::sleep(DAY + Duration::from_secs(1)).await;
        assert_eq!(job.runs().len(), 2);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_run_does_not_block_next_firing() {
        let job = Arc::new(RecordingJob {
            hang: true,
            ..RecordingJob::new()
        });
        let (tx, handle) = spawn_trigger(Arc::clone(&job), Duration::ZERO);

        tokio::time::sleep(2 * DAY + Duration::from_secs(1)).await;
        assert_eq!(job.runs().len(), 3);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_first_firing() {
        let job = Arc::new(RecordingJob::new());
        let (tx, handle) = spawn_trigger(Arc::clone(&job), HOUR);

        tx.send(true).unwrap();
        handle.await.unwrap();

        tokio::time::sleep(2 * HOUR).await;
        assert!(job.runs().is_empty());
    }
}
