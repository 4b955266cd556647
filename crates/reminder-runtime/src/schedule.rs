//! Daily start times.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone};

use crate::error::{Result, RuntimeError};

/// Layout of one start time, e.g. `9:30AM`.
const START_TIME_FORMAT: &str = "%I:%M%p";

/// A wall-clock time of day at which the reminder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StartTime(NaiveTime);

impl StartTime {
    /// Parses one `h:mmAM`/`h:mmPM` time; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Result<Self> {
        NaiveTime::parse_from_str(value.trim(), START_TIME_FORMAT)
            .map(Self)
            .map_err(|source| RuntimeError::Schedule {
                value: value.to_string(),
                source,
            })
    }

    /// Parses a comma-separated list of start times.
    ///
    /// # Errors
    /// Fails on the first malformed entry, or when the list is empty.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        let times = list
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>>>()?;
        if times.is_empty() {
            return Err(RuntimeError::EmptySchedule);
        }
        Ok(times)
    }

    /// The time of day.
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Next occurrence at or after `now`: today if not yet passed, else
    /// tomorrow.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let mut date = now.date_naive();
        loop {
            let local = date.and_time(self.0);
            // Times inside a DST gap do not exist that day.
            if let Some(at) = tz.from_local_datetime(&local).earliest() {
                if at >= *now {
                    return at;
                }
            }
            date += TimeDelta::days(1);
        }
    }

    /// Delay from `now` until the next occurrence.
    pub fn delay_from<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        (self.next_after(now) - now.clone())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%-I:%M%p"))
    }
}
