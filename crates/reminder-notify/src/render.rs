//! Markdown rendering of a classification result.

use std::fmt::Write;

use reminder_core::config::DEFAULT_LIST_HEADER;
use reminder_core::NotificationConfig;
use reminder_models::{Bucket, ClassifiedTask, ClassifiedTasks};

/// Titles and labels of the daily message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub title: String,
    pub now_due_title: String,
    pub overdue_title: String,
    pub no_deadline_title: String,
    /// First line of every section, naming the columns.
    pub list_header: String,
}

impl MessageTemplate {
    /// Creates a template with the default column header.
    pub fn new(
        title: impl Into<String>,
        now_due_title: impl Into<String>,
        overdue_title: impl Into<String>,
        no_deadline_title: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            now_due_title: now_due_title.into(),
            overdue_title: overdue_title.into(),
            no_deadline_title: no_deadline_title.into(),
            list_header: DEFAULT_LIST_HEADER.to_string(),
        }
    }

    /// Creates a template from the notification settings.
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            list_header: config.list_header.clone(),
            ..Self::new(
                config.title.clone(),
                config.now_task_list_desc.clone(),
                config.not_done_task_list_desc.clone(),
                config.no_deadline_task_list_desc.clone(),
            )
        }
    }

    /// Renders the message body.
    ///
    /// ```text
    /// # {title}
    /// ---
    /// ## {now due}
    /// - executor task deadline
    /// ## {overdue}
    /// ...
    /// ## {no deadline}
    /// ...
    /// ---
    /// ```
    pub fn render(&self, tasks: &ClassifiedTasks) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}", self.title);
        out.push_str("---\n");
        for (title, bucket) in [
            (&self.now_due_title, Bucket::NowDue),
            (&self.overdue_title, Bucket::Overdue),
            (&self.no_deadline_title, Bucket::NoDeadline),
        ] {
            let _ = writeln!(out, "## {title}");
            self.render_section(&mut out, tasks.bucket(bucket));
        }
        out.push_str("---\n");
        out
    }

    fn render_section(&self, out: &mut String, rows: &[ClassifiedTask]) {
        let _ = writeln!(out, "{}", self.list_header);
        for task in rows {
            let line = format!(
                "- {} {} {}",
                task.executor_name,
                task.task_name,
                task.deadline.as_deref().unwrap_or_default()
            );
            let _ = writeln!(out, "{}", line.trim_end());
        }
    }
}
