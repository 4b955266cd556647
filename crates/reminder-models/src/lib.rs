//! Core data models for the task reminder bot.
//!
//! This crate provides the data types shared by the classification
//! pipeline and the notification layer: the untyped task record returned
//! by the project-management API, the classified task rows, and the small
//! JSON documents (iterations, holiday info) the pipeline decodes.

pub mod api;
pub mod task;
pub mod value;

// Re-export main types
pub use api::{DateInfo, TaskIteration};
pub use task::{Bucket, ClassifiedTask, ClassifiedTasks, ExecutorSet};
pub use value::{RawTask, RawValue, ValueKind};
