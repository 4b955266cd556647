//! Task classification.
//!
//! Partitions the raw task list into three buckets relative to "today"
//! (midnight of the reference instant, in its own time zone):
//!
//! | deadline | done | outcome |
//! |---|---|---|
//! | absent or not a string | not checked | `NoDeadline` |
//! | `[today, today + 24h)` | false | `NowDue` |
//! | before today | false | `Overdue` |
//! | after the window | false | dropped |
//! | any | true | dropped |
//!
//! The deadline is read before the done flag, so a task without a deadline
//! is listed even if it is done and never needs a readable done flag.

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use reminder_models::{Bucket, ClassifiedTask, ClassifiedTasks, RawTask};
use tracing::{debug, trace};

use crate::config::FieldMapping;
use crate::deadline::DeadlineFormat;
use crate::error::ClassifyError;
use crate::extract::{extract, FieldValue};

/// Classifies `tasks` against the reference instant `now`.
///
/// Pure: the same inputs always produce the same buckets, in input order.
///
/// # Errors
/// Aborts on the first task whose deadline does not parse, or whose done
/// flag, name or executor (when needed) cannot be read.
pub fn classify<Tz: TimeZone>(
    tasks: &[RawTask],
    mapping: &FieldMapping,
    format: &DeadlineFormat,
    now: &DateTime<Tz>,
) -> Result<ClassifiedTasks, ClassifyError> {
    let today = start_of_day(now);
    let tomorrow = today + TimeDelta::days(1);
    let tz = now.timezone();

    let mut result = ClassifiedTasks::new();

    for (index, task) in tasks.iter().enumerate() {
        let deadline = match extract::<String>(task, &mapping.task_deadline) {
            Ok(deadline) => deadline,
            Err(e) => {
                trace!(index, reason = %e, "Task has no deadline");
                result.push(Bucket::NoDeadline, row(task, index, mapping)?);
                continue;
            }
        };

        let parsed = format
            .parse(&deadline, &tz)
            .map_err(|source| ClassifyError::InvalidDeadline {
                index,
                value: deadline.clone(),
                format: format.layout().to_string(),
                source,
            })?;

        let done: bool = required(task, index, &mapping.task_done, "task_done")?;
        if done {
            continue;
        }

        let task_row = row(task, index, mapping)?.with_deadline(parsed.display());
        if parsed.at >= today && parsed.at < tomorrow {
            result.push(Bucket::NowDue, task_row);
        } else if parsed.at < today {
            result.push(Bucket::Overdue, task_row);
        } else {
            trace!(index, deadline = %deadline, "Task due after today, not listed");
        }
    }

    debug!(
        total = tasks.len(),
        now_due = result.now_due.len(),
        overdue = result.overdue.len(),
        no_deadline = result.no_deadline.len(),
        executors = result.executors.len(),
        "Classified tasks"
    );

    Ok(result)
}

/// Midnight of `now`'s calendar day in its own time zone.
fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // No local midnight (DST jump at 00:00): step back by the time of day.
        .unwrap_or_else(|| now.with_timezone(&Utc) - (now.time() - NaiveTime::MIN))
}

fn required<T: FieldValue>(
    task: &RawTask,
    index: usize,
    path: &str,
    field: &'static str,
) -> Result<T, ClassifyError> {
    extract(task, path).map_err(|source| ClassifyError::MissingField {
        index,
        field,
        source,
    })
}

fn row(task: &RawTask, index: usize, mapping: &FieldMapping) -> Result<ClassifiedTask, ClassifyError> {
    let task_name: String = required(task, index, &mapping.task_name, "task_name")?;
    let executor_name: String = required(task, index, &mapping.executor_name, "executor_name")?;
    Ok(ClassifiedTask::new(executor_name, task_name))
}
