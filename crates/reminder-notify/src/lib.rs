//! Notification delivery for the reminder bot.
//!
//! This crate turns a classification result into a chat message and
//! delivers it:
//!
//! - [`MessageTemplate`] renders the three task sections as markdown
//! - [`NotificationProvider`] is the chat-provider seam; [`DingTalkProvider`]
//!   is the implemented webhook robot
//! - [`NotificationSender`] resolves @-mentions through the member
//!   directory and retries delivery at a fixed interval until it succeeds
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use reminder_core::MemberDirectory;
//! use reminder_models::ClassifiedTasks;
//! use reminder_notify::{DingTalkProvider, MessageTemplate, NotificationSender, RetryPolicy};
//!
//! # async fn run() -> Result<(), reminder_notify::NotifyError> {
//! let provider = Arc::new(DingTalkProvider::new("robot-token", reqwest::Client::new()));
//! let template = MessageTemplate::new("Daily tasks", "Due today", "Overdue", "No deadline");
//! let sender = NotificationSender::new(
//!     provider,
//!     template,
//!     Arc::new(MemberDirectory::default()),
//!     RetryPolicy::unbounded(Duration::from_secs(60)),
//! );
//! let delivery = sender.send(&ClassifiedTasks::new()).await?;
//! println!("delivered after {} attempt(s)", delivery.attempts);
//! # Ok(())
//! # }
//! ```

pub mod dingtalk;
pub mod error;
pub mod provider;
pub mod render;
pub mod sender;

pub use dingtalk::DingTalkProvider;
pub use error::{NotifyError, Result};
pub use provider::{provider_for, NotificationProvider};
pub use render::MessageTemplate;
pub use sender::{Delivery, NotificationSender, RetryPolicy};
