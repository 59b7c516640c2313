use crate::consts::{CALENDAR_MONTH_START, DECEMBER, JANUARY, LONGEST_MONTH_DAYS, MAX_START_DAY, MIN_DAY};
use crate::ConfigError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// Day of the month on which a billing cycle begins, guaranteed to be in `1..=MAX_START_DAY`.
/// Uses `NonZeroU8` internally, so 0 is not a valid start day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StartDay(NonZeroU8);

impl StartDay {
    /// Plain calendar months.
    pub const CALENDAR_MONTH: Self = match NonZeroU8::new(CALENDAR_MONTH_START) {
        Some(day) => Self(day),
        None => unreachable!(),
    };

    /// Creates a new start day, validating that it's non-zero and <= `MAX_START_DAY`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidStartDay` if the value is 0 or > `MAX_START_DAY`.
    pub fn new(value: u8) -> Result<Self, ConfigError> {
        let non_zero = NonZeroU8::new(value).ok_or(ConfigError::InvalidStartDay(value))?;
        if value > MAX_START_DAY {
            return Err(ConfigError::InvalidStartDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the start day as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// True when cycles follow calendar months
    #[inline]
    pub const fn is_calendar_month(self) -> bool {
        self.0.get() == CALENDAR_MONTH_START
    }

    /// The start day as it falls in the given month, clamped to that month's length
    pub fn clamped_to(self, year: i32, month: u32) -> u32 {
        u32::from(self.0.get()).min(days_in_month(year, month))
    }
}

impl Default for StartDay {
    fn default() -> Self {
        Self::CALENDAR_MONTH
    }
}

impl TryFrom<u8> for StartDay {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StartDay> for u8 {
    fn from(day: StartDay) -> Self {
        day.0.get()
    }
}

impl fmt::Display for StartDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Helper functions

pub(crate) const fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == JANUARY { (year - 1, DECEMBER) } else { (year, month - 1) }
}

pub(crate) const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == DECEMBER { (year + 1, JANUARY) } else { (year, month + 1) }
}

/// Number of days in the month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = next_month(year, month);
    NaiveDate::from_ymd_opt(ny, nm, MIN_DAY)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(LONGEST_MONTH_DAYS, |last| last.day())
}
