//! Scheduling and the reminder pipeline.
//!
//! This crate runs the bot:
//! - `TaskSource` - authenticated GETs against the task API
//! - `ReminderPipeline` - one run: holiday gate, fetch, classify, deliver
//! - `StartTime` - the configured `h:mmAM` times of day
//! - `DailyTrigger` - fires a job at a start time, then every 24 hours
//! - `Runtime` - arms one trigger per start time and stops them on shutdown
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use reminder_runtime::{ReminderPipeline, Runtime, RuntimeConfig, StartTime};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline: Arc<ReminderPipeline> = build_pipeline()?;
//!     let config = RuntimeConfig::new().with_start_times(StartTime::parse_list("9:30AM,5:30PM")?);
//!
//!     let mut runtime = Runtime::new(config, pipeline)?;
//!     runtime.start()?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency
//!
//! Every firing spawns an independent run. Runs from different start times,
//! or a slow run and the next day's firing, may overlap; nothing serializes
//! them. Config and the member directory are shared read-only.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod runtime;
pub mod schedule;
pub mod source;
pub mod trigger;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use pipeline::{ReminderJob, ReminderPipeline, RunOutcome};
pub use runtime::Runtime;
pub use schedule::StartTime;
pub use source::{HttpTaskSource, TaskSource};
pub use trigger::DailyTrigger;
