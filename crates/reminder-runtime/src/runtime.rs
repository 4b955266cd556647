//! Main runtime manager.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::pipeline::ReminderJob;
use crate::trigger::DailyTrigger;

/// Arms one daily trigger per start time.
pub struct Runtime {
    /// Trigger settings.
    config: RuntimeConfig,
    /// The job every trigger runs.
    job: Arc<dyn ReminderJob>,
    /// Handles to the trigger tasks.
    trigger_handles: Vec<JoinHandle<()>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver (for cloning to triggers).
    shutdown_rx: watch::Receiver<bool>,
    /// Whether the runtime has been started.
    started: bool,
}

impl Runtime {
    /// Create a new runtime with the given configuration.
    ///
    /// # Errors
    /// Returns [`RuntimeError::EmptySchedule`] when no start time is set.
    pub fn new(config: RuntimeConfig, job: Arc<dyn ReminderJob>) -> Result<Self> {
        if config.start_times.is_empty() {
            return Err(RuntimeError::EmptySchedule);
        }
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            job,
            trigger_handles: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            started: false,
        })
    }

    /// Start the runtime (arms every trigger).
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }

        info!(triggers = self.config.start_times.len(), "starting runtime");

        let now = Local::now();
        for &time in &self.config.start_times {
            let delay = time.delay_from(&now);
            info!(
                time = %time,
                next_run = %time.next_after(&now).format("%Y-%m-%d %H:%M"),
                delay_secs = delay.as_secs(),
                "Trigger armed"
            );

            let mut trigger = DailyTrigger::new(
                time,
                delay,
                self.config.period,
                Arc::clone(&self.job),
                self.shutdown_rx.clone(),
            );
            self.trigger_handles
                .push(tokio::spawn(async move { trigger.run().await }));
        }

        self.started = true;

        debug!("runtime started");

        Ok(())
    }

    /// Stop every trigger.
    ///
    /// Does not wait for runs already in flight; they are dropped when the
    /// tokio runtime shuts down.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down runtime");

        self.shutdown_tx.send(true).map_err(|e| {
            RuntimeError::Shutdown(format!("failed to send shutdown signal: {}", e))
        })?;

        for handle in self.trigger_handles.drain(..) {
            handle
                .await
                .map_err(|e| RuntimeError::Shutdown(format!("trigger task panicked: {}", e)))?;
        }

        self.started = false;

        info!("runtime stopped");

        Ok(())
    }

    /// Check if the runtime has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        // Send shutdown signal if still running
        if self.started {
            let _ = self.shutdown_tx.send(true);
        }
    }
}
