//! Reminder Core - the classification logic and its inputs.
//!
//! This crate provides the pure parts of the reminder pipeline plus the
//! startup collaborators they depend on:
//!
//! - **extract**: dotted-path lookup over untyped task records
//! - **deadline**: deadline layouts (strftime or Go reference layouts)
//! - **classifier**: partition tasks into now-due / overdue / no-deadline
//! - **holiday**: optional gate that skips today's run on holidays
//! - **config**: `config/config.toml` loading with environment overrides
//! - **members**: executor name to contact directory from `members.csv`

pub mod classifier;
pub mod config;
pub mod deadline;
pub mod error;
pub mod extract;
pub mod holiday;
pub mod members;

// Re-export commonly used items for convenience
pub use classifier::classify;
pub use config::{
    config_file, members_file, Auth, Config, FieldMapping, HttpConfig, LoginConfig,
    NotificationConfig, ProjectConfig, ProviderKind, CONFIG_FILE_NAME, DEFAULT_CONFIG_DIR,
    MEMBERS_FILE_NAME,
};
pub use deadline::{DeadlineFormat, ParsedDeadline};
pub use error::{ClassifyError, ConfigError, ExtractError};
pub use extract::{extract, FieldValue};
pub use holiday::{HolidayGate, SkipPolicy};
pub use members::MemberDirectory;
