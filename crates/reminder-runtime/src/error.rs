//! Error types for the runtime crate.

use reminder_core::{ClassifyError, ConfigError};
use reminder_notify::NotifyError;
use thiserror::Error;

/// Errors from scheduling or a pipeline run.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A configured start time is not `h:mmAM`/`h:mmPM`.
    #[error("invalid start time `{value}`: {source}")]
    Schedule {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// No start times configured.
    #[error("no start times configured")]
    EmptySchedule,

    /// Transport error talking to the task API.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The task API answered with something other than 200.
    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// A task API response was not the expected JSON.
    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The iteration list was empty.
    #[error("no task iterations returned")]
    EmptyIterations,

    /// Classification aborted.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Delivery gave up.
    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Startup configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Runtime not started.
    #[error("runtime not started")]
    NotStarted,

    /// Runtime already started.
    #[error("runtime already started")]
    AlreadyStarted,

    /// Shutdown error.
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
