//! Review of expenses extracted from a voice note.
//!
//! The backend turns a recording into [`VoiceParseResponse`]. The user edits the
//! rows on a [`ReviewSheet`], confirms, and each confirmed row is handed to an
//! [`ExpenseSink`] as a [`NewExpense`].

use std::fmt::Display;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Engine;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{DATA_URL_SEPARATOR, LOW_CONFIDENCE_THRESHOLD, VOICE_PARSE_FALLBACK_ERROR};
use crate::cycle::{Dated, local_instant};

/// One expense as recognised by the speech parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedExpense {
    pub name:       String,
    pub amount:     f64,
    pub category:   String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags:       Vec<String>,
    pub date:       DateTime<Utc>,
    /// 0..=1
    pub confidence: f64,
    #[serde(default)]
    pub ambiguous:  bool,
}

impl ParsedExpense {
    /// Low confidence or an ambiguous utterance; the user should look twice.
    pub fn needs_attention(&self) -> bool {
        self.confidence < LOW_CONFIDENCE_THRESHOLD || self.ambiguous
    }
}

impl Dated for ParsedExpense {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Body of a successful voice parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceParseResponse {
    #[serde(default)]
    pub expenses:     Vec<ParsedExpense>,
    #[serde(default)]
    pub transcript:   String,
    #[serde(default)]
    pub needs_review: bool,
}

/// Body sent to the voice parser: the recording as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceParseRequest {
    pub audio_data: String,
}

impl VoiceParseRequest {
    /// Wraps raw audio as `data:<mime>;base64,<payload>`.
    pub fn from_audio(mime: &str, audio: &[u8]) -> Self {
        Self { audio_data: format!("data:{mime};base64,{}", Base64Engine.encode(audio)) }
    }

    /// Decodes the payload, with or without the data URL prefix.
    ///
    /// # Errors
    /// Returns the decoder error when the payload is not valid base64.
    pub fn decode_audio(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = self
            .audio_data
            .split_once(DATA_URL_SEPARATOR)
            .map_or(self.audio_data.as_str(), |(_, payload)| payload);
        Base64Engine.decode(payload)
    }
}

/// Error body returned by the backend on a failed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: Some(error.into()) }
    }

    /// The backend's message, or a generic one when it sent none.
    pub fn message(&self) -> &str {
        self.error.as_deref().filter(|e| !e.is_empty()).unwrap_or(VOICE_PARSE_FALLBACK_ERROR)
    }

    /// Text shown to the user when parsing fails.
    pub fn user_message(&self) -> String {
        format!("Failed to parse voice input: {}", self.message())
    }
}

/// Editable row of the review sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRow {
    pub name:     String,
    pub amount:   f64,
    pub category: String,
    pub date:     NaiveDate,
    pub flagged:  bool,
}

impl ReviewRow {
    fn from_parsed<Tz: TimeZone>(expense: ParsedExpense, tz: &Tz) -> Self {
        let flagged = expense.needs_attention();
        Self {
            name: expense.name,
            amount: expense.amount,
            category: expense.category,
            date: expense.date.with_timezone(tz).date_naive(),
            flagged,
        }
    }

    /// Category choices for this row, with its current category selected.
    pub fn category_options<'a>(&self, categories: &'a [String]) -> Vec<CategoryOption<'a>> {
        categories
            .iter()
            .map(|name| CategoryOption {
                name,
                selected: *name == self.category,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryOption<'a> {
    pub name:     &'a str,
    pub selected: bool,
}

/// Parsed expenses awaiting confirmation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewSheet {
    transcript: String,
    rows:       Vec<ReviewRow>,
}

impl ReviewSheet {
    /// Builds the sheet, showing each parsed instant as a calendar date in `tz`.
    pub fn from_response<Tz: TimeZone>(response: VoiceParseResponse, tz: &Tz) -> Self {
        let rows: Vec<ReviewRow> = response
            .expenses
            .into_iter()
            .map(|expense| ReviewRow::from_parsed(expense, tz))
            .collect();
        debug!(
            rows = rows.len(),
            flagged = rows.iter().filter(|r| r.flagged).count(),
            "built review sheet"
        );
        Self {
            transcript: response.transcript,
            rows,
        }
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Transcript in display quotes, or `None` when the parser returned none.
    pub fn quoted_transcript(&self) -> Option<String> {
        (!self.transcript.is_empty()).then(|| format!("\"{}\"", self.transcript))
    }

    pub fn rows(&self) -> &[ReviewRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut ReviewRow> {
        self.rows.get_mut(index)
    }

    /// Drops a row; out-of-range indexes are ignored.
    pub fn remove(&mut self, index: usize) -> Option<ReviewRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// True when nothing was detected or every row was removed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn needs_review(&self) -> bool {
        self.rows.iter().any(|r| r.flagged)
    }

    /// Turns the remaining rows into submissions.
    ///
    /// Each row keeps its (possibly edited) calendar date and takes the time of day
    /// from `now`, to the second, in `now`'s time zone.
    pub fn confirm<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<NewExpense> {
        let tz = now.timezone();
        let time_of_day = NaiveTime::from_hms_opt(now.hour(), now.minute(), now.second()).unwrap_or(NaiveTime::MIN);

        self.rows
            .iter()
            .map(|row| NewExpense {
                name:     row.name.clone(),
                amount:   row.amount,
                category: row.category.clone(),
                date:     local_instant(&tz, row.date.and_time(time_of_day)),
                tags:     Vec::new(),
            })
            .collect()
    }
}

/// Payload for creating one expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub name:     String,
    pub amount:   f64,
    pub category: String,
    pub date:     DateTime<Utc>,
    pub tags:     Vec<String>,
}

impl Dated for NewExpense {
    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Destination for confirmed expenses, usually the backend's create endpoint.
pub trait ExpenseSink {
    type Error: Display;

    /// # Errors
    /// Returns the sink's error when the expense was not stored.
    fn submit(&mut self, expense: &NewExpense) -> Result<(), Self::Error>;
}

/// Outcome of [`submit_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub succeeded: usize,
    pub failed:    usize,
}

impl SubmissionReport {
    pub const fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// User-facing summary lines, success first.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if self.succeeded > 0 {
            messages.push(format!("Successfully added {} expense(s)!", self.succeeded));
        }
        if self.failed > 0 {
            messages.push(format!("Failed to add {} expense(s). Please try again.", self.failed));
        }
        messages
    }
}

/// Submits every expense in order. A failure is counted and the batch carries on.
pub fn submit_all<S: ExpenseSink>(sink: &mut S, expenses: &[NewExpense]) -> SubmissionReport {
    let mut report = SubmissionReport::default();
    for expense in expenses {
        match sink.submit(expense) {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                warn!(name = %expense.name, error = %e, "failed to add expense");
                report.failed += 1;
            },
        }
    }
    info!(succeeded = report.succeeded, failed = report.failed, "submitted reviewed expenses");
    report
}
