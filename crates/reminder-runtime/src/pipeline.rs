//! One reminder run: gate, fetch, classify, deliver.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use reminder_core::{classify, DeadlineFormat, HolidayGate, ProjectConfig};
use reminder_models::{RawTask, TaskIteration};
use reminder_notify::NotificationSender;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};
use crate::source::TaskSource;

/// What a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Today is a holiday; nothing was fetched or sent.
    SkippedHoliday,
    /// The message was delivered.
    Delivered {
        now_due: usize,
        overdue: usize,
        no_deadline: usize,
        mentioned: usize,
        attempts: u32,
    },
}

/// Something the scheduler triggers.
#[async_trait]
pub trait ReminderJob: Send + Sync {
    /// Performs one run.
    async fn run(&self) -> Result<RunOutcome>;
}

/// The reminder pipeline.
pub struct ReminderPipeline {
    project: ProjectConfig,
    format: DeadlineFormat,
    source: Arc<dyn TaskSource>,
    gate: HolidayGate,
    sender: NotificationSender,
}

impl ReminderPipeline {
    /// Creates a pipeline for `project`.
    pub fn new(
        project: ProjectConfig,
        source: Arc<dyn TaskSource>,
        gate: HolidayGate,
        sender: NotificationSender,
    ) -> Self {
        let format = DeadlineFormat::new(&project.task_deadline_format);
        Self {
            project,
            format,
            source,
            gate,
            sender,
        }
    }

    /// Runs the pipeline with `now` as the reference instant for "today".
    pub async fn run_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Result<RunOutcome> {
        if self.gate.should_skip().await {
            info!("Today is a holiday, skipping run");
            return Ok(RunOutcome::SkippedHoliday);
        }

        let iterations: Vec<TaskIteration> = self.fetch_json(&self.project.task_iteration_list_url).await?;
        let iteration = iterations.first().ok_or(RuntimeError::EmptyIterations)?;
        debug!(iteration = %iteration.id, count = iterations.len(), "Using first iteration");

        let url = self.project.task_list_url_for(&iteration.id);
        let mut tasks: Vec<RawTask> = self.fetch_json(&url).await?;
        let max = self.project.task_list_max_size;
        if max > 0 && tasks.len() > max {
            warn!(received = tasks.len(), max, "Task list larger than task_list_max_size, ignoring the rest");
            tasks.truncate(max);
        }

        let classified = classify(&tasks, &self.project.field_mapping, &self.format, &now)?;
        info!(
            tasks = tasks.len(),
            now_due = classified.now_due.len(),
            overdue = classified.overdue.len(),
            no_deadline = classified.no_deadline.len(),
            executors = classified.executors.len(),
            "Tasks classified"
        );

        let delivery = self.sender.send(&classified).await?;

        Ok(RunOutcome::Delivered {
            now_due: classified.now_due.len(),
            overdue: classified.overdue.len(),
            no_deadline: classified.no_deadline.len(),
            mentioned: delivery.mentioned,
            attempts: delivery.attempts,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.source.fetch(url).await?;
        serde_json::from_slice(&body).map_err(|source| RuntimeError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ReminderJob for ReminderPipeline {
    async fn run(&self) -> Result<RunOutcome> {
        self.run_at(Local::now()).await
    }
}
