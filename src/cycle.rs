//! Billing-cycle windows.
//!
//! A cycle either follows calendar months or starts on a fixed day of the month.
//! When the start day does not exist in a month (the 31st in April, the 30th in
//! February) the cycle starts on that month's last day instead. Calendar fields are
//! read in the reference instant's own time zone and the resulting bounds are
//! returned as UTC instants.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{DST_GAP_MAX_STEPS, DST_GAP_STEP_HOURS, MIN_DAY};
use crate::types::{days_in_month, next_month, previous_month};
use crate::{DateRange, StartDay};

/// Anything carrying the instant it happened at.
pub trait Dated {
    /// When the record happened.
    fn date(&self) -> DateTime<Utc>;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn date(&self) -> DateTime<Utc> {
        (**self).date()
    }
}

/// How expense periods are cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleConfig {
    pub start_day: StartDay,
}

impl CycleConfig {
    /// Cycles starting on `start_day`; a start day of 1 means calendar months.
    pub const fn new(start_day: StartDay) -> Self {
        Self { start_day }
    }

    /// Cycle containing `reference`, see [`compute_bounds`].
    pub fn bounds<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> DateRange {
        compute_bounds(reference, self)
    }

    /// Records inside the cycle containing `reference`, most recent first.
    pub fn select<'a, R: Dated, Tz: TimeZone>(&self, records: &'a [R], reference: &DateTime<Tz>) -> Vec<&'a R> {
        select_in_window(records, &self.bounds(reference))
    }
}

impl From<StartDay> for CycleConfig {
    fn from(start_day: StartDay) -> Self {
        Self::new(start_day)
    }
}

/// Calendar date from fields that may carry day 0, which rolls back to the
/// last day of the preceding month.
fn calendar_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day.max(MIN_DAY))
        .map(|date| if day == 0 { date.pred_opt().unwrap_or(date) } else { date })
        .unwrap_or(NaiveDate::MIN)
}

/// Maps a wall-clock time in `tz` onto the UTC timeline.
///
/// Ambiguous times (clocks turned back) pick the earlier instant. Nonexistent times
/// (clocks turned forward, or a whole skipped day) move forward an hour at a time
/// until they land on a real instant.
pub(crate) fn local_instant<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    for step in 0..=DST_GAP_MAX_STEPS {
        let candidate = local + Duration::hours(step * DST_GAP_STEP_HOURS);
        let resolved = match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
            LocalResult::None => continue,
        };
        if step > 0 {
            warn!(%local, shifted_hours = step * DST_GAP_STEP_HOURS, "local time falls in a DST gap");
        }
        return resolved.with_timezone(&Utc);
    }
    local.and_utc()
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    local_instant(tz, date.and_time(NaiveTime::MIN))
}

/// Last millisecond before the following local day begins, so that a window
/// ending on `date` abuts the window starting the day after.
fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    date.succ_opt().map_or_else(
        || date.and_time(NaiveTime::MIN).and_utc() + Duration::days(1),
        |next| start_of_day(tz, next),
    ) - Duration::milliseconds(1)
}

/// Computes the inclusive window of the cycle that contains `reference`.
///
/// With a start day of 1 this is the calendar month. Otherwise the cycle runs from
/// the start day (clamped to each month's own length) up to the day before the next
/// cycle's start, ending at 23:59:59.999 local time.
pub fn compute_bounds<Tz: TimeZone>(reference: &DateTime<Tz>, config: &CycleConfig) -> DateRange {
    let tz = reference.timezone();
    let local = reference.date_naive();
    let (year, month, day) = (local.year(), local.month(), local.day());

    let (start, end) = if config.start_day.is_calendar_month() {
        (
            calendar_date(year, month, MIN_DAY),
            calendar_date(year, month, days_in_month(year, month)),
        )
    } else {
        let this_start = config.start_day.clamped_to(year, month);
        if day < this_start {
            let (py, pm) = previous_month(year, month);
            let prev_start = config.start_day.clamped_to(py, pm);
            (calendar_date(py, pm, prev_start), calendar_date(year, month, this_start - 1))
        } else {
            let (ny, nm) = next_month(year, month);
            let next_start = config.start_day.clamped_to(ny, nm);
            (calendar_date(year, month, this_start), calendar_date(ny, nm, next_start - 1))
        }
    };

    let range = DateRange::from_ordered(start_of_day(&tz, start), end_of_day(&tz, end));
    debug!(start_day = config.start_day.get(), %local, %range, "computed cycle bounds");
    range
}

/// Records dated inside `window` (both ends included), most recent first.
/// Records sharing an instant keep their input order.
pub fn select_in_window<'a, R: Dated>(records: &'a [R], window: &DateRange) -> Vec<&'a R> {
    let mut selected: Vec<&R> = records.iter().filter(|r| window.contains(&r.date())).collect();
    selected.sort_by(|a, b| b.date().cmp(&a.date()));
    selected
}
