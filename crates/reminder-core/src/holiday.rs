//! Holiday gate.
//!
//! When `notification.exclude_date = 1`, each run first asks a date-info
//! endpoint whether today is a holiday and skips the run if so. The gate
//! fails open: any transport or decode error lets the run proceed.

use reminder_models::DateInfo;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::NotificationConfig;

/// Whether runs consult the holiday endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u8")]
pub enum SkipPolicy {
    /// Always run.
    #[default]
    NotSkipped,
    /// Skip days the date endpoint reports as holidays.
    SkippedHoliday,
}

impl TryFrom<u8> for SkipPolicy {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SkipPolicy::NotSkipped),
            1 => Ok(SkipPolicy::SkippedHoliday),
            other => Err(format!("unknown exclude_date policy {other}")),
        }
    }
}

/// Decides whether today's run should be skipped.
#[derive(Debug, Clone)]
pub struct HolidayGate {
    policy: SkipPolicy,
    date_url: String,
    client: reqwest::Client,
}

impl HolidayGate {
    /// Creates a gate.
    pub fn new(policy: SkipPolicy, date_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            policy,
            date_url: date_url.into(),
            client,
        }
    }

    /// Creates a gate from the notification settings.
    pub fn from_config(config: &NotificationConfig, client: reqwest::Client) -> Self {
        Self::new(config.exclude_date, config.date_url.clone(), client)
    }

    /// Returns the configured policy.
    pub fn policy(&self) -> SkipPolicy {
        self.policy
    }

    /// Returns true if today's run should be skipped.
    ///
    /// Never fails: lookup errors are logged and treated as a workday.
    pub async fn should_skip(&self) -> bool {
        match self.policy {
            SkipPolicy::NotSkipped => false,
            SkipPolicy::SkippedHoliday => match self.lookup().await {
                Ok(info) => {
                    debug!(is_holiday = info.is_holiday, "Fetched date info");
                    info.is_holiday
                }
                Err(e) => {
                    warn!(url = %self.date_url, error = %e, "Holiday lookup failed, running anyway");
                    false
                }
            },
        }
    }

    async fn lookup(&self) -> reqwest::Result<DateInfo> {
        self.client
            .get(&self.date_url)
            .send()
            .await?
            .error_for_status()?
            .json::<DateInfo>()
            .await
    }
}
