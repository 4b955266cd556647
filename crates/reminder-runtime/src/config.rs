//! Runtime configuration.

use std::time::Duration;

use crate::schedule::StartTime;

/// One day, the default trigger period.
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Times of day at which a run is triggered.
    pub start_times: Vec<StartTime>,
    /// How often each trigger repeats after its first firing.
    pub period: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            start_times: Vec::new(),
            period: DAY,
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start times.
    pub fn with_start_times(mut self, start_times: Vec<StartTime>) -> Self {
        self.start_times = start_times;
        self
    }

    /// Sets the trigger period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();

        assert!(config.start_times.is_empty());
        assert_eq!(config.period, Duration::from_secs(86_400));
    }

    #[test]
    fn test_config_builder() {
        let times = StartTime::parse_list("9:30AM").unwrap();
        let config = RuntimeConfig::new()
            .with_start_times(times.clone())
            .with_period(Duration::from_secs(60));

        assert_eq!(config.start_times, times);
        assert_eq!(config.period, Duration::from_secs(60));
    }
}
