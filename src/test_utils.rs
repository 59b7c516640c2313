//! Shorthand constructors shared by unit tests.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{Dated, StartDay};

/// Midnight UTC on the given day.
pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid test date")
        .and_hms_opt(0, 0, 0)
        .expect("valid test time")
        .and_utc()
}

/// 23:59:59.999 UTC on the given day.
pub fn end_of_day_utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    utc(year, month, day) + Duration::days(1) - Duration::milliseconds(1)
}

pub fn start_day(day: u8) -> StartDay {
    StartDay::new(day).expect("valid test start day")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id:   u32,
    pub date: DateTime<Utc>,
}

impl Record {
    pub const fn new(id: u32, date: DateTime<Utc>) -> Self {
        Self { id, date }
    }
}

impl Dated for Record {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}
