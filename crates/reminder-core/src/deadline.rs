//! Deadline layouts.
//!
//! `project.task_deadline_format` is either a strftime pattern (anything
//! containing `%`) or a Go reference layout such as `2006-01-02`, which is
//! translated once at startup.

use chrono::format::ParseErrorKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Go layout chunks and their strftime equivalents.
///
/// Longer chunks come first so that e.g. `2006` wins over `2`.
const GO_CHUNKS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    (".000", "%.3f"),
    // `Z` zones also accept a literal `Z` for UTC.
    ("Z07:00", "%#z"),
    ("Z0700", "%#z"),
    ("Z07", "%#z"),
    ("-07:00", "%:z"),
    ("-0700", "%z"),
    ("-07", "%#z"),
    ("2006", "%Y"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("002", "%j"),
    ("_2", "%e"),
    ("01", "%m"),
    ("02", "%d"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("06", "%y"),
    ("15", "%H"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

/// A parsed task deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDeadline {
    /// The deadline instant.
    pub at: DateTime<Utc>,
    /// The calendar date as written in the deadline string.
    pub date: NaiveDate,
}

impl ParsedDeadline {
    /// Display form `YYYY-M-D`, without zero padding.
    pub fn display(&self) -> String {
        self.date.format("%Y-%-m-%-d").to_string()
    }
}

/// A deadline layout ready for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineFormat {
    layout: String,
    pattern: String,
    zulu: bool,
}

impl DeadlineFormat {
    /// Creates a format from a strftime pattern or a Go reference layout.
    pub fn new(layout: &str) -> Self {
        let pattern = if layout.contains('%') {
            layout.to_string()
        } else {
            translate_go_layout(layout)
        };
        // A trailing literal `Z` marks UTC timestamps without an offset field.
        let zulu = pattern.ends_with('Z') && !pattern.ends_with("%Z");

        Self {
            layout: layout.to_string(),
            pattern,
            zulu,
        }
    }

    /// The layout as configured.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// The strftime pattern used for parsing.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses a deadline string.
    ///
    /// Values carrying an offset keep it. Values without one are read in
    /// `tz` (or UTC for `...Z` layouts); date-only values mean midnight.
    pub fn parse<Tz: TimeZone>(&self, value: &str, tz: &Tz) -> Result<ParsedDeadline, chrono::ParseError> {
        match DateTime::parse_from_str(value, &self.pattern) {
            Ok(dt) => {
                return Ok(ParsedDeadline {
                    at: dt.with_timezone(&Utc),
                    date: dt.date_naive(),
                })
            }
            Err(e) if e.kind() != ParseErrorKind::NotEnough => return Err(e),
            Err(_) => {}
        }

        let naive = match NaiveDateTime::parse_from_str(value, &self.pattern) {
            Ok(naive) => naive,
            Err(e) if e.kind() != ParseErrorKind::NotEnough => return Err(e),
            Err(_) => NaiveDate::parse_from_str(value, &self.pattern)?.and_time(NaiveTime::MIN),
        };

        Ok(ParsedDeadline {
            at: self.localize(naive, tz),
            date: naive.date(),
        })
    }

    fn localize<Tz: TimeZone>(&self, naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
        if self.zulu {
            return Utc.from_utc_datetime(&naive);
        }
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            // Skipped by a DST jump: fall back to reading it as UTC.
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
    }
}

/// Translates a Go reference layout into a strftime pattern.
pub fn translate_go_layout(layout: &str) -> String {
    let mut pattern = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'outer: while !rest.is_empty() {
        for (chunk, spec) in GO_CHUNKS {
            if let Some(tail) = rest.strip_prefix(chunk) {
                pattern.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                pattern.push_str("%%");
            } else {
                pattern.push(c);
            }
        }
        rest = chars.as_str();
    }

    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_translate_common_layouts() {
        assert_eq!(translate_go_layout("2006-01-02"), "%Y-%m-%d");
        assert_eq!(
            translate_go_layout("2006-01-02T15:04:05.000Z"),
            "%Y-%m-%dT%H:%M:%S%.3fZ"
        );
        assert_eq!(
            translate_go_layout("2006-01-02T15:04:05Z07:00"),
            "%Y-%m-%dT%H:%M:%S%#z"
        );
        assert_eq!(
            translate_go_layout("2006-01-02T15:04:05-07:00"),
            "%Y-%m-%dT%H:%M:%S%:z"
        );
        assert_eq!(translate_go_layout("2006-01-02 15:04 Z0700"), "%Y-%m-%d %H:%M %#z");
        assert_eq!(translate_go_layout("2006-01-02 15:04 -07"), "%Y-%m-%d %H:%M %#z");
        assert_eq!(translate_go_layout("3:04PM"), "%-I:%M%p");
        assert_eq!(translate_go_layout("Jan 2, 2006"), "%b %-d, %Y");
        assert_eq!(translate_go_layout("2006/01/02 15:04"), "%Y/%m/%d %H:%M");
    }

    #[test]
    fn test_strftime_passthrough() {
        let format = DeadlineFormat::new("%Y/%m/%d");
        assert_eq!(format.pattern(), "%Y/%m/%d");
        assert_eq!(format.layout(), "%Y/%m/%d");
    }

    #[test]
    fn test_parse_date_only_in_reference_zone() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let parsed = DeadlineFormat::new("2006-01-02").parse("2024-05-01", &tz).unwrap();

        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(parsed.at.to_rfc3339(), "2024-04-30T16:00:00+00:00");
        assert_eq!(parsed.display(), "2024-5-1");
    }

    #[test]
    fn test_parse_zulu_layout_is_utc() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let parsed = DeadlineFormat::new("2006-01-02T15:04:05.000Z")
            .parse("2024-05-01T16:00:00.000Z", &tz)
            .unwrap();

        assert_eq!(parsed.at.to_rfc3339(), "2024-05-01T16:00:00+00:00");
        assert_eq!(parsed.display(), "2024-5-1");
    }

    #[test]
    fn test_parse_with_offset() {
        let parsed = DeadlineFormat::new("%Y-%m-%dT%H:%M:%S%:z")
            .parse("2024-12-09T01:30:00+08:00", &Utc)
            .unwrap();

        assert_eq!(parsed.at.to_rfc3339(), "2024-12-08T17:30:00+00:00");
        assert_eq!(parsed.display(), "2024-12-9");
    }

    #[test]
    fn test_rfc3339_layout_accepts_utc_and_offsets() {
        let format = DeadlineFormat::new("2006-01-02T15:04:05Z07:00");

        let utc = format.parse("2024-05-01T10:00:00Z", &Utc).unwrap();
        assert_eq!(utc.at.to_rfc3339(), "2024-05-01T10:00:00+00:00");

        let east = format.parse("2024-05-01T10:00:00+08:00", &Utc).unwrap();
        assert_eq!(east.at.to_rfc3339(), "2024-05-01T02:00:00+00:00");
        assert_eq!(east.display(), "2024-5-1");
    }

    #[test]
    fn test_compact_and_hour_only_zones() {
        let compact = DeadlineFormat::new("2006-01-02 15:04 Z0700");
        assert_eq!(
            compact.parse("2024-05-01 10:00 Z", &Utc).unwrap().at.to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
        assert_eq!(
            compact.parse("2024-05-01 10:00 +0800", &Utc).unwrap().at.to_rfc3339(),
            "2024-05-01T02:00:00+00:00"
        );

        let hours = DeadlineFormat::new("2006-01-02 15:04 -07");
        assert_eq!(
            hours.parse("2024-05-01 10:00 +08", &Utc).unwrap().at.to_rfc3339(),
            "2024-05-01T02:00:00+00:00"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let format = DeadlineFormat::new("2006-01-02");
        assert!(format.parse("next tuesday", &Utc).is_err());
        assert!(format.parse("", &Utc).is_err());
    }
}
