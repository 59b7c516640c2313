//! Billing-cycle windows and display helpers for an expense tracker.
//!
//! The core is [`compute_bounds`]: given a reference instant and a cycle start day it
//! returns the inclusive window of the cycle containing that instant, which
//! [`select_in_window`] then uses to pick and order expenses. Around it sit currency
//! formatting, month labels and the voice-review workflow that turns parsed speech into
//! expense submissions.

mod config;
mod consts;
mod currency;
mod cycle;
mod display;
mod prelude;
mod range;
mod types;
mod voice;

#[cfg(test)]
mod test_utils;

pub use config::Settings;
pub use consts::*;
pub use currency::{Currency, CurrencyStyle, format_currency};
pub use cycle::{CycleConfig, Dated, compute_bounds, select_in_window};
pub use display::{escape_html, format_timestamp, month_label};
pub use range::{DateRange, RangeError};
pub use types::{StartDay, days_in_month};
pub use voice::{
    CategoryOption, ErrorBody, ExpenseSink, NewExpense, ParsedExpense, ReviewRow, ReviewSheet,
    SubmissionReport, VoiceParseRequest, VoiceParseResponse, submit_all,
};

use crate::prelude::*;

/// Invalid user settings, reported once when they are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ConfigError {
    #[display(fmt = "Invalid start day: {} (must be 1-{})", "_0", MAX_START_DAY)]
    InvalidStartDay(u8),
    #[display(fmt = "Unknown currency: {_0}")]
    UnknownCurrency(String),
    #[display(fmt = "Unknown time zone: {_0}")]
    UnknownTimeZone(String),
    #[display(fmt = "Malformed settings: {_0}")]
    Malformed(String),
}

impl std::error::Error for ConfigError {}
