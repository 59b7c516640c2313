/// Largest configurable cycle start day (inclusive)
pub const MAX_START_DAY: u8 = 31;

/// Start day that selects plain calendar-month cycles
pub const CALENDAR_MONTH_START: u8 = 1;

/// First day of month, used for lower bounds
pub const MIN_DAY: u32 = 1;

/// Month number for January
pub const JANUARY: u32 = 1;
/// Month number for December
pub const DECEMBER: u32 = 12;

/// Length of the longest month, used when a date falls outside chrono's range
pub(crate) const LONGEST_MONTH_DAYS: u32 = 31;

/// Step used to walk forward out of a DST gap, in hours
pub(crate) const DST_GAP_STEP_HOURS: i64 = 1;
/// Upper bound on forward steps when resolving a nonexistent local time
pub(crate) const DST_GAP_MAX_STEPS: i64 = 24;

/// Parsed expenses below this confidence are flagged for review
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Separator between the two instants of a serialized range
pub const RANGE_SEPARATOR: char = '/';

/// Separates the data URL header from its base64 payload
pub const DATA_URL_SEPARATOR: char = ',';

/// Shown when a failed voice parse carries no message of its own
pub const VOICE_PARSE_FALLBACK_ERROR: &str = "Failed to parse audio";
