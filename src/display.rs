//! Strings shown next to expense lists.

use std::borrow::Cow;
use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

/// Heading for the period containing `reference`, e.g. `October 2026`.
pub fn month_label<Tz: TimeZone>(reference: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    reference.format("%B %Y").to_string()
}

/// Timestamp as shown on an expense row, e.g. `Oct 19, 2026, 03:04 PM EDT`.
pub fn format_timestamp<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    instant.with_timezone(tz).format("%b %-d, %Y, %I:%M %p %Z").to_string()
}

/// Escapes text for interpolation into HTML markup.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '\'', '"']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
