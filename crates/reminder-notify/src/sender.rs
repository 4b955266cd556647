//! Delivery with retry.
//!
//! A run's message is delivered at least once: failed attempts are retried
//! after a fixed interval, without limit by default. Only the calling run
//! waits; other scheduled runs are independent tasks.

use std::sync::Arc;
use std::time::Duration;

use reminder_core::MemberDirectory;
use reminder_models::ClassifiedTasks;
use tracing::{info, warn};

use crate::error::{NotifyError, Result};
use crate::provider::NotificationProvider;
use crate::render::MessageTemplate;

/// Fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between a failed attempt and the next one.
    pub interval: Duration,
    /// Give up after this many attempts; `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever.
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: None,
        }
    }

    /// Retry until `max_attempts` attempts have been made.
    pub fn bounded(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Result of a successful delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Contacts that were @-mentioned.
    pub mentioned: usize,
}

/// Renders, resolves mentions and delivers the daily message.
pub struct NotificationSender {
    provider: Arc<dyn NotificationProvider>,
    template: MessageTemplate,
    members: Arc<MemberDirectory>,
    retry: RetryPolicy,
}

impl NotificationSender {
    /// Creates a sender.
    pub fn new(
        provider: Arc<dyn NotificationProvider>,
        template: MessageTemplate,
        members: Arc<MemberDirectory>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            template,
            members,
            retry,
        }
    }

    /// Returns the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Delivers the message for `tasks`.
    ///
    /// # Errors
    /// Only with a bounded policy, once every attempt has failed.
    pub async fn send(&self, tasks: &ClassifiedTasks) -> Result<Delivery> {
        let mentions = self.members.resolve(&tasks.executors);
        let body = self.template.render(tasks);

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self
                .provider
                .send_markdown(&self.template.title, &body, &mentions)
                .await
            {
                Ok(()) => {
                    info!(
                        provider = self.provider.name(),
                        attempts,
                        mentioned = mentions.len(),
                        "Notification delivered"
                    );
                    return Ok(Delivery {
                        attempts,
                        mentioned: mentions.len(),
                    });
                }
                Err(e) if self.retry.exhausted(attempts) => {
                    return Err(NotifyError::RetriesExhausted {
                        attempts,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(
                        provider = self.provider.name(),
                        attempt = attempts,
                        retry_in_secs = self.retry.interval.as_secs(),
                        error = %e,
                        "Notification send failed, retrying"
                    );
                    tokio::time::sleep(self.retry.interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reminder_models::{Bucket, ClassifiedTask};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Fails the first `failures` calls, recording every call.
    struct FlakyProvider {
        failures: u32,
        calls: Mutex<Vec<(Instant, String, Vec<String>)>>,
    }

    impl FlakyProvider {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NotificationProvider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn send_markdown(&self, _title: &str, body: &str, mentions: &[String]) -> Result<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((Instant::now(), body.to_string(), mentions.to_vec()));
            if calls.len() as u32 <= self.failures {
                return Err(NotifyError::Rejected {
                    code: 310000,
                    message: "keywords not in content".into(),
                });
            }
            Ok(())
        }
    }

    fn members() -> Arc<MemberDirectory> {
        Arc::new(
            [("alice".to_string(), "111".to_string())]
                .into_iter()
                .collect(),
        )
    }

    fn tasks() -> ClassifiedTasks {
        let mut tasks = ClassifiedTasks::new();
        tasks.push(Bucket::NowDue, ClassifiedTask::new("alice", "Release").with_deadline("2024-5-1"));
        tasks.push(Bucket::NoDeadline, ClassifiedTask::new("ghost", "Unowned"));
        tasks
    }

    fn sender(provider: Arc<FlakyProvider>, retry: RetryPolicy) -> NotificationSender {
        NotificationSender::new(
            provider,
            MessageTemplate::new("Daily", "Today", "Overdue", "Someday"),
            members(),
            retry,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success_at_fixed_interval() {
        let provider = Arc::new(FlakyProvider::new(2));
        let sender = sender(Arc::clone(&provider), RetryPolicy::unbounded(Duration::from_secs(60)));

        let delivery = sender.send(&tasks()).await.unwrap();

        assert_eq!(delivery.attempts, 3);
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].0 - calls[0].0, Duration::from_secs(60));
        assert_eq!(calls[2].0 - calls[1].0, Duration::from_secs(60));
        // Same message every attempt.
        assert_eq!(calls[0].1, calls[2].1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_executors_not_mentioned_but_listed() {
        let provider = Arc::new(FlakyProvider::new(0));
        let sender = sender(Arc::clone(&provider), RetryPolicy::unbounded(Duration::from_secs(60)));

        let delivery = sender.send(&tasks()).await.unwrap();

        assert_eq!(delivery, Delivery { attempts: 1, mentioned: 1 });
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].2, vec!["111".to_string()]);
        assert!(calls[0].1.contains("- ghost Unowned"));
        assert!(calls[0].1.contains("- alice Release 2024-5-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_policy_gives_up() {
        let provider = Arc::new(FlakyProvider::new(5));
        let sender = sender(Arc::clone(&provider), RetryPolicy::bounded(Duration::from_secs(1), 3));

        let err = sender.send(&tasks()).await.unwrap_err();

        assert!(matches!(err, NotifyError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(provider.calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_sender_reports_retry_policy() {
        let retry = RetryPolicy::bounded(Duration::from_secs(5), 2);
        let sender = sender(Arc::new(FlakyProvider::new(0)), retry);
        assert_eq!(sender.retry_policy(), retry);
    }

    #[test]
    fn test_policy_constructors() {
        let policy = RetryPolicy::unbounded(Duration::from_secs(60));
        assert!(!policy.exhausted(u32::MAX));

        let policy = RetryPolicy::bounded(Duration::from_secs(1), 0);
        assert_eq!(policy.max_attempts, Some(1));
        assert!(policy.exhausted(1));
    }
}
