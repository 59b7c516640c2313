use std::{fmt, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::RANGE_SEPARATOR;

/// An inclusive window between two absolute instants.
/// The start instant is always less than or equal to the end instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateRange {
    start: DateTime<Utc>,
    end:   DateTime<Utc>,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start instant is after end instant.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: DateTime<Utc>, end: DateTime<Utc> },

    /// Error parsing one of the instants.
    #[error("Invalid instant {input:?}: {reason}")]
    InvalidInstant { input: String, reason: String },

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from bounds the caller has already ordered.
    pub(crate) fn from_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end, "range bounds out of order: {start} > {end}");
        Self { start, end }
    }

    /// Returns the first instant of the range
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the last instant of the range (inclusive)
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns both bounds as a tuple
    pub const fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    /// Checks if the instant falls inside the range, both ends included
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    /// Checks if this range shares at least one instant with another range
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{RANGE_SEPARATOR}{}",
            self.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, RangeError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RangeError::InvalidInstant {
            input:  s.to_owned(),
            reason: e.to_string(),
        })
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!("Separator '{RANGE_SEPARATOR}' not found despite count == 1"))
                })?;
                let start = parse_instant(start_str.trim())?;
                let end = parse_instant(end_str.trim())?;
                Self::new(start, end)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{end_of_day_utc, utc};
    use chrono::Duration;

    #[test]
    fn test_new_range_cases() {
        struct TestCase {
            start:          DateTime<Utc>,
            end:            DateTime<Utc>,
            should_succeed: bool,
            description:    &'static str,
        }

        let cases = [
            TestCase {
                start:          utc(2024, 1, 1),
                end:            utc(2024, 1, 31),
                should_succeed: true,
                description:    "valid range (start < end)",
            },
            TestCase {
                start:          utc(2024, 1, 31),
                end:            utc(2024, 1, 1),
                should_succeed: false,
                description:    "invalid range (start > end)",
            },
            TestCase {
                start:          utc(2024, 1, 1),
                end:            utc(2024, 1, 1),
                should_succeed: true,
                description:    "equal instants (start == end)",
            },
        ];

        for case in &cases {
            let range = DateRange::new(case.start, case.end);

            if case.should_succeed {
                assert!(range.is_ok(), "Expected success for: {}", case.description);
            } else {
                assert!(
                    matches!(range, Err(RangeError::InvalidRange { .. })),
                    "Expected failure for: {}",
                    case.description
                );
            }
        }
    }

    #[test]
    fn test_accessors() {
        let start = utc(2024, 1, 1);
        let end = end_of_day_utc(2024, 1, 31);
        let range = DateRange::new(start, end).expect("failed to construct range for accessor test");

        assert_eq!(range.start(), start);
        assert_eq!(range.end(), end);
        assert_eq!(range.bounds(), (start, end));
    }

    #[test]
    fn test_contains_is_inclusive_at_both_ends() {
        let start = utc(2024, 1, 1);
        let end = end_of_day_utc(2024, 1, 31);
        let range = DateRange::new(start, end).expect("failed to construct range for contains test");

        assert!(range.contains(&start));
        assert!(range.contains(&end));
        assert!(range.contains(&utc(2024, 1, 15)));
        assert!(!range.contains(&(start - Duration::milliseconds(1))));
        assert!(!range.contains(&(end + Duration::milliseconds(1))));
    }

    #[test]
    fn test_overlaps() {
        let january = DateRange::new(utc(2024, 1, 1), end_of_day_utc(2024, 1, 31))
            .expect("failed to construct january range");
        let mid = DateRange::new(utc(2024, 1, 15), end_of_day_utc(2024, 2, 14))
            .expect("failed to construct mid range");
        let march = DateRange::new(utc(2024, 3, 1), end_of_day_utc(2024, 3, 31))
            .expect("failed to construct march range");

        assert!(january.overlaps(&mid));
        assert!(mid.overlaps(&january));
        assert!(!january.overlaps(&march));
    }

    #[test]
    fn test_display() {
        let range = DateRange::new(utc(2024, 1, 1), end_of_day_utc(2024, 1, 31))
            .expect("failed to construct range for display test");

        assert_eq!(range.to_string(), "2024-01-01T00:00:00.000Z/2024-01-31T23:59:59.999Z");
    }

    #[test]
    fn test_from_str_accepts_offsets() {
        let range = "2024-01-01T00:00:00+01:00/2024-01-31T23:59:59.999+01:00"
            .parse::<DateRange>()
            .expect("failed to parse range with offsets");
        assert_eq!(range.start().to_rfc3339(), "2023-12-31T23:00:00+00:00");
    }

    #[test]
    fn test_from_str_invalid_order() {
        let result = "2024-02-01T00:00:00Z/2024-01-01T00:00:00Z".parse::<DateRange>();
        assert!(matches!(result, Err(RangeError::InvalidRange { .. })));
    }

    #[test]
    fn test_from_str_bad_instant() {
        let result = "2024-01-01/2024-01-31".parse::<DateRange>();
        assert!(matches!(result, Err(RangeError::InvalidInstant { .. })));
    }

    #[test]
    fn test_too_many_range_separators() {
        let err = "2024-01-01T00:00:00Z/2024-01-02T00:00:00Z/2024-01-03T00:00:00Z"
            .parse::<DateRange>()
            .expect_err("expected error for too many range separators");
        assert!(err.to_string().contains("expected 1, found 2"));
    }

    #[test]
    fn test_no_range_separator() {
        let err = "2024-01-01T00:00:00Z"
            .parse::<DateRange>()
            .expect_err("expected error for missing range separator");
        assert!(err.to_string().contains("No range separator found"));
    }

    #[test]
    fn test_serde_string_format() {
        let range = DateRange::new(utc(2024, 1, 1), end_of_day_utc(2024, 1, 31))
            .expect("failed to construct range for serde string test");

        let json = serde_json::to_string(&range).expect("failed to serialize range to JSON");
        assert_eq!(json, r#""2024-01-01T00:00:00.000Z/2024-01-31T23:59:59.999Z""#);

        let parsed: DateRange = serde_json::from_str(&json).expect("failed to deserialize range from JSON");
        assert_eq!(range, parsed);
    }
}
