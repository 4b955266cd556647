//! Chat provider seam.

use std::sync::Arc;

use async_trait::async_trait;
use reminder_core::{NotificationConfig, ProviderKind};
use tracing::info;

use crate::dingtalk::DingTalkProvider;
use crate::error::{NotifyError, Result};

/// A chat service that accepts markdown messages with @-mentions.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Posts one markdown message mentioning `mentions` (contact ids).
    async fn send_markdown(&self, title: &str, body: &str, mentions: &[String]) -> Result<()>;
}

/// Selects the provider configured by `notification.type`.
///
/// # Errors
/// Returns [`NotifyError::UnsupportedProvider`] for providers without an
/// implementation.
pub fn provider_for(
    config: &NotificationConfig,
    client: reqwest::Client,
) -> Result<Arc<dyn NotificationProvider>> {
    match config.kind {
        ProviderKind::DingTalk => {
            let provider = DingTalkProvider::from_config(config, client);
            info!(provider = provider.name(), signed = provider.is_signed(), "Notification provider ready");
            Ok(Arc::new(provider))
        }
        kind @ (ProviderKind::WeCom | ProviderKind::Lark) => Err(NotifyError::UnsupportedProvider(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification(kind: u8) -> NotificationConfig {
        serde_json::from_value(json!({
            "type": kind,
            "token": "robot-token",
            "start_time": "9:30AM",
            "title": "Daily tasks",
            "now_task_list_desc": "Due today",
            "not_done_task_list_desc": "Overdue",
            "no_deadline_task_list_desc": "No deadline"
        }))
        .unwrap()
    }

    #[test]
    fn test_dingtalk_selected() {
        let provider = provider_for(&notification(0), reqwest::Client::new()).ok().unwrap();
        assert_eq!(provider.name(), "dingtalk");
    }

    #[test]
    fn test_other_providers_unsupported() {
        for (kind, expected) in [(1, ProviderKind::WeCom), (2, ProviderKind::Lark)] {
            let err = provider_for(&notification(kind), reqwest::Client::new()).err().unwrap();
            assert!(matches!(err, NotifyError::UnsupportedProvider(k) if k == expected));
        }
    }
}
