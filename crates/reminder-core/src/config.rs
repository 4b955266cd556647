//! Bot configuration.
//!
//! Configuration lives in `config/config.toml` relative to the working
//! directory, next to the `members.csv` directory file.
//!
//! # Environment Variables
//!
//! Every key present in the file can be overridden by an environment
//! variable named after its path, upper-cased, with `.` replaced by `_`:
//!
//! - `LOGIN_COOKIE` overrides `login.cookie`
//! - `NOTIFICATION_TOKEN` overrides `notification.token`
//! - `PROJECT_FIELD_MAPPING_TASK_DONE` overrides `project.field_mapping.task_done`

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::holiday::SkipPolicy;

/// Default configuration directory, relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Configuration file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Member directory file name inside the config directory.
pub const MEMBERS_FILE_NAME: &str = "members.csv";

/// Placeholder in `project.task_list_url` replaced by the iteration id.
pub const ITERATION_PLACEHOLDER: &str = "{}";

const DEFAULT_RETRY_INTERVAL_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default first line of each task section, naming the columns.
pub const DEFAULT_LIST_HEADER: &str = "- 执行人 任务名称 截止时间";

/// Get the config file path inside `dir`.
pub fn config_file(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Get the members file path inside `dir`.
pub fn members_file(dir: &Path) -> PathBuf {
    dir.join(MEMBERS_FILE_NAME)
}

/// Top-level configuration, immutable after load.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub login: LoginConfig,
    pub project: ProjectConfig,
    pub notification: NotificationConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Credentials for the project-management API.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// One of `cookie`, `token`, `password`.
    pub login_type: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub cookie: String,
    pub token: String,
}

impl fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginConfig")
            .field("login_type", &self.login_type)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("cookie", &redact(&self.cookie))
            .field("token", &redact(&self.token))
            .finish()
    }
}

/// How requests to the task API are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// Send the configured value as the `Cookie` header.
    Cookie(String),
    /// Send a pre-issued token as a bearer `Authorization` header.
    Token(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Cookie(_) => f.write_str("Auth::Cookie(***)"),
            Auth::Token(_) => f.write_str("Auth::Token(***)"),
        }
    }
}

impl LoginConfig {
    /// Resolves the configured login type.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedLogin`] for `password` (the token
    /// exchange is not implemented) and for empty or unknown types.
    pub fn auth(&self) -> Result<Auth> {
        match self.login_type.trim() {
            "cookie" => Ok(Auth::Cookie(self.cookie.clone())),
            "token" => Ok(Auth::Token(self.token.clone())),
            other => Err(ConfigError::UnsupportedLogin(other.to_string())),
        }
    }
}

/// Task API endpoints and record interpretation.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub task_iteration_list_url: String,
    /// Task list URL; `{}` is replaced by the first iteration id.
    pub task_list_url: String,
    /// Maximum number of tasks considered per run, `0` for no limit.
    #[serde(default)]
    pub task_list_max_size: usize,
    /// strftime pattern or Go reference layout of the deadline field.
    pub task_deadline_format: String,
    pub field_mapping: FieldMapping,
}

impl ProjectConfig {
    /// Builds the task list URL for an iteration.
    pub fn task_list_url_for(&self, iteration_id: &str) -> String {
        self.task_list_url
            .replacen(ITERATION_PLACEHOLDER, iteration_id, 1)
    }
}

/// Dotted paths into the raw task records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    pub executor_name: String,
    pub task_name: String,
    pub task_done: String,
    pub task_deadline: String,
}

/// Chat providers selectable by `notification.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum ProviderKind {
    DingTalk,
    WeCom,
    Lark,
}

impl TryFrom<u8> for ProviderKind {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(ProviderKind::DingTalk),
            1 => Ok(ProviderKind::WeCom),
            2 => Ok(ProviderKind::Lark),
            other => Err(format!("unknown notification type {other}")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::DingTalk => "dingtalk",
            ProviderKind::WeCom => "wecom",
            ProviderKind::Lark => "lark",
        };
        f.write_str(name)
    }
}

/// Delivery, schedule and message settings.
#[derive(Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    #[serde(default)]
    pub webhook: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
    /// Comma-separated `h:mmAM` times.
    pub start_time: String,
    #[serde(default)]
    pub exclude_date: SkipPolicy,
    #[serde(default)]
    pub date_url: String,
    pub title: String,
    pub now_task_list_desc: String,
    pub not_done_task_list_desc: String,
    pub no_deadline_task_list_desc: String,
    #[serde(default = "default_list_header")]
    pub list_header: String,
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

impl fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("kind", &self.kind)
            .field("webhook", &self.webhook)
            .field("token", &redact(&self.token))
            .field("key", &redact(&self.key))
            .field("secret", &redact(&self.secret))
            .field("start_time", &self.start_time)
            .field("exclude_date", &self.exclude_date)
            .field("date_url", &self.date_url)
            .field("title", &self.title)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .finish_non_exhaustive()
    }
}

impl NotificationConfig {
    /// Delay between failed delivery attempts.
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    /// Signing secret for the webhook: `secret`, falling back to `key`.
    pub fn signing_secret(&self) -> Option<&str> {
        [self.secret.as_str(), self.key.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
    }
}

/// Outbound HTTP limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpConfig {
    /// Builds the shared HTTP client with these limits.
    pub fn client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}

fn default_list_header() -> String {
    DEFAULT_LIST_HEADER.to_string()
}

fn default_retry_interval_secs() -> u64 {
    DEFAULT_RETRY_INTERVAL_SECS
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "***"
    }
}

impl Config {
    /// Loads and validates `config.toml` from `dir`, applying overrides
    /// from the process environment.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails validation.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = config_file(dir);
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Loading config");
        Self::from_toml_str(&content, |key| std::env::var(key).ok())
    }

    /// Parses a TOML document, applying overrides from `env`.
    pub fn from_toml_str<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut table: toml::Table = content.parse()?;
        apply_env_overrides(&mut table, "", &env)?;
        let config: Config = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the schema cannot express.
    pub fn validate(&self) -> Result<()> {
        let project = &self.project;
        let mapping = &project.field_mapping;
        let required = [
            ("project.task_iteration_list_url", &project.task_iteration_list_url),
            ("project.task_list_url", &project.task_list_url),
            ("project.task_deadline_format", &project.task_deadline_format),
            ("project.field_mapping.executor_name", &mapping.executor_name),
            ("project.field_mapping.task_name", &mapping.task_name),
            ("project.field_mapping.task_done", &mapping.task_done),
            ("project.field_mapping.task_deadline", &mapping.task_deadline),
            ("notification.start_time", &self.notification.start_time),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{key} must not be empty")));
            }
        }

        if self.notification.exclude_date == SkipPolicy::SkippedHoliday
            && self.notification.date_url.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "notification.date_url is required when exclude_date = 1".to_string(),
            ));
        }

        if self.http.timeout_secs == 0 || self.http.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid("http timeouts must be positive".to_string()));
        }

        if self.notification.retry_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "notification.retry_interval_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Replaces leaf values with `PATH_TO_KEY` environment variables.
fn apply_env_overrides<F>(table: &mut toml::Table, prefix: &str, env: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    for (key, value) in table.iter_mut() {
        let name = if prefix.is_empty() {
            key.to_uppercase()
        } else {
            format!("{prefix}_{}", key.to_uppercase())
        };

        if let toml::Value::Table(inner) = value {
            apply_env_overrides(inner, &name, env)?;
            continue;
        }

        let Some(raw) = env(&name) else {
            continue;
        };
        let invalid = || ConfigError::EnvOverride {
            key: name.clone(),
            value: raw.clone(),
        };
        let replaced = match value {
            toml::Value::Integer(_) => {
                toml::Value::Integer(raw.trim().parse().map_err(|_| invalid())?)
            }
            toml::Value::Boolean(_) => {
                toml::Value::Boolean(raw.trim().parse().map_err(|_| invalid())?)
            }
            toml::Value::Float(_) => toml::Value::Float(raw.trim().parse().map_err(|_| invalid())?),
            _ => toml::Value::String(raw.clone()),
        };
        *value = replaced;
        debug!(key = %name, "Applied environment override");
    }
    Ok(())
}
