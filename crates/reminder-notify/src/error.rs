//! Error types for notification delivery.

use reminder_core::ProviderKind;
use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but refused the message.
    #[error("provider rejected message: {code} {message}")]
    Rejected { code: i64, message: String },

    /// The configured provider has no implementation.
    #[error("notification provider `{0}` is not supported")]
    UnsupportedProvider(ProviderKind),

    /// A bounded retry policy gave up.
    #[error("delivery failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<NotifyError>,
    },
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
