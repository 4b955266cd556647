//! DingTalk custom robot webhook.
//!
//! Messages are posted as markdown to
//! `https://oapi.dingtalk.com/robot/send?access_token=...`. Robots with the
//! "signature" security setting also need `timestamp` and `sign` query
//! parameters, where `sign` is the base64 HMAC-SHA256 of
//! `"{timestamp}\n{secret}"` keyed by the secret.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use reminder_core::NotificationConfig;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

use crate::error::{NotifyError, Result};
use crate::provider::NotificationProvider;

type HmacSha256 = Hmac<Sha256>;

/// Default robot endpoint.
pub const DEFAULT_WEBHOOK: &str = "https://oapi.dingtalk.com/robot/send";

/// DingTalk robot client.
pub struct DingTalkProvider {
    webhook: String,
    token: String,
    secret: Option<String>,
    client: reqwest::Client,
}

impl DingTalkProvider {
    /// Create a provider for the default endpoint.
    pub fn new(token: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            webhook: DEFAULT_WEBHOOK.to_string(),
            token: token.into(),
            secret: None,
            client,
        }
    }

    /// Create a provider from the notification settings.
    pub fn from_config(config: &NotificationConfig, client: reqwest::Client) -> Self {
        let mut provider = Self::new(config.token.clone(), client);
        if !config.webhook.trim().is_empty() {
            provider = provider.with_webhook(config.webhook.trim());
        }
        if let Some(secret) = config.signing_secret() {
            provider = provider.with_secret(secret);
        }
        provider
    }

    /// Overrides the endpoint URL.
    pub fn with_webhook(mut self, webhook: impl Into<String>) -> Self {
        self.webhook = webhook.into();
        self
    }

    /// Enables request signing.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Returns true if requests are signed.
    pub fn is_signed(&self) -> bool {
        self.secret.is_some()
    }

    /// Compute the `sign` parameter for a millisecond timestamp.
    pub fn sign(secret: &str, timestamp_ms: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(format!("{timestamp_ms}\n{secret}").as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    /// Build the markdown message body.
    fn payload(title: &str, body: &str, mentions: &[String]) -> DingTalkMessage {
        let mut text = body.to_string();
        if !mentions.is_empty() {
            // Mentions only highlight when the phone also appears in the text.
            let at_line: Vec<String> = mentions.iter().map(|m| format!("@{m}")).collect();
            text.push_str("\n\n");
            text.push_str(&at_line.join(" "));
        }

        DingTalkMessage {
            msgtype: "markdown",
            markdown: Markdown {
                title: title.to_string(),
                text,
            },
            at: At {
                at_mobiles: mentions.to_vec(),
                is_at_all: false,
            },
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if !self.token.is_empty() {
            query.push(("access_token", self.token.clone()));
        }
        if let Some(secret) = &self.secret {
            let timestamp = chrono::Utc::now().timestamp_millis();
            query.push(("timestamp", timestamp.to_string()));
            query.push(("sign", Self::sign(secret, timestamp)));
        }
        query
    }
}

#[async_trait]
impl NotificationProvider for DingTalkProvider {
    fn name(&self) -> &'static str {
        "dingtalk"
    }

    async fn send_markdown(&self, title: &str, body: &str, mentions: &[String]) -> Result<()> {
        let payload = Self::payload(title, body, mentions);

        let response: DingTalkResponse = self
            .client
            .post(&self.webhook)
            .query(&self.query())
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.errcode != 0 {
            return Err(NotifyError::Rejected {
                code: response.errcode,
                message: response.errmsg,
            });
        }

        debug!(mentions = mentions.len(), "DingTalk message sent");
        Ok(())
    }
}

/// DingTalk markdown message.
#[derive(Debug, Serialize)]
struct DingTalkMessage {
    msgtype: &'static str,
    markdown: Markdown,
    at: At,
}

#[derive(Debug, Serialize)]
struct Markdown {
    title: String,
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct At {
    at_mobiles: Vec<String>,
    is_at_all: bool,
}

#[derive(Debug, Deserialize)]
struct DingTalkResponse {
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}
