//! Classified task types.
//!
//! A classification run turns raw task records into three mutually
//! exclusive buckets plus the set of executors that need an @-mention.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The set of executor display names to mention.
///
/// Ordered so that rendering and mention lists are deterministic.
pub type ExecutorSet = BTreeSet<String>;

/// Classification outcome for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Due within today's 24h window.
    NowDue,
    /// Deadline already passed and the task is not done.
    Overdue,
    /// No deadline set.
    NoDeadline,
}

/// A task row ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedTask {
    /// Display name of the task's executor.
    pub executor_name: String,
    /// Task title.
    pub task_name: String,
    /// Deadline formatted as `YYYY-M-D`, absent for no-deadline tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl ClassifiedTask {
    /// Creates a task row without a deadline.
    pub fn new(executor_name: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            executor_name: executor_name.into(),
            task_name: task_name.into(),
            deadline: None,
        }
    }

    /// Sets the display deadline.
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}

/// Result of classifying one task list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassifiedTasks {
    pub now_due: Vec<ClassifiedTask>,
    pub overdue: Vec<ClassifiedTask>,
    pub no_deadline: Vec<ClassifiedTask>,
    pub executors: ExecutorSet,
}

impl ClassifiedTasks {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task to a bucket and records its executor.
    pub fn push(&mut self, bucket: Bucket, task: ClassifiedTask) {
        self.executors.insert(task.executor_name.clone());
        self.bucket_mut(bucket).push(task);
    }

    /// Returns the tasks in a bucket, in input order.
    pub fn bucket(&self, bucket: Bucket) -> &[ClassifiedTask] {
        match bucket {
            Bucket::NowDue => &self.now_due,
            Bucket::Overdue => &self.overdue,
            Bucket::NoDeadline => &self.no_deadline,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<ClassifiedTask> {
        match bucket {
            Bucket::NowDue => &mut self.now_due,
            Bucket::Overdue => &mut self.overdue,
            Bucket::NoDeadline => &mut self.no_deadline,
        }
    }

    /// Total number of classified tasks across all buckets.
    pub fn len(&self) -> usize {
        self.now_due.len() + self.overdue.len() + self.no_deadline.len()
    }

    /// Returns true if no task landed in any bucket.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
