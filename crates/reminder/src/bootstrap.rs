//! Startup wiring: every startup-fatal check happens here.

use std::path::Path;
use std::sync::Arc;

use reminder_core::{members_file, Config, HolidayGate, MemberDirectory};
use reminder_notify::{provider_for, MessageTemplate, NotificationSender, RetryPolicy};
use reminder_runtime::{HttpTaskSource, ReminderPipeline, Result, RuntimeConfig, StartTime};
use tracing::info;

/// Everything `main` needs to run.
pub struct App {
    pub pipeline: Arc<ReminderPipeline>,
    pub runtime_config: RuntimeConfig,
}

/// Loads config and members from `config_dir` and builds the pipeline.
///
/// # Errors
/// Fails on unreadable or invalid config, a bad member file, an unsupported
/// login or provider type, or a malformed start time.
pub fn build(config_dir: &Path) -> Result<App> {
    let config = Config::load(config_dir)?;
    info!(config = ?config, "Config loaded");

    let members = MemberDirectory::load(&members_file(config_dir))?;
    info!(count = members.len(), "Members loaded");

    let auth = config.login.auth()?;
    let start_times = StartTime::parse_list(&config.notification.start_time)?;

    let client = config.http.client()?;
    let provider = provider_for(&config.notification, client.clone())?;
    let gate = HolidayGate::from_config(&config.notification, client.clone());
    let sender = NotificationSender::new(
        provider,
        MessageTemplate::from_config(&config.notification),
        Arc::new(members),
        RetryPolicy::unbounded(config.notification.retry_interval()),
    );
    let source = HttpTaskSource::new(client, auth);
    info!(
        holiday_policy = ?gate.policy(),
        retry_interval_secs = sender.retry_policy().interval.as_secs(),
        start_times = start_times.len(),
        "Pipeline ready"
    );

    let pipeline = ReminderPipeline::new(config.project, Arc::new(source), gate, sender);

    Ok(App {
        pipeline: Arc::new(pipeline),
        runtime_config: RuntimeConfig::new().with_start_times(start_times),
    })
}
