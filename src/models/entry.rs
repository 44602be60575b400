//! Exam table row model and its wire forms.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the exam table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamEntry {
    /// Exam date
    pub date: NaiveDate,

    /// Time of day, if the student recorded one
    pub time: Option<NaiveTime>,

    /// Short subject code, e.g. "204111"
    pub subject_id: String,

    /// Full subject name
    pub subject_name: String,
}

impl ExamEntry {
    /// Create an entry without a time of day.
    pub fn new(date: NaiveDate, subject_id: impl Into<String>, subject_name: impl Into<String>) -> Self {
        Self {
            date,
            time: None,
            subject_id: subject_id.into(),
            subject_name: subject_name.into(),
        }
    }

    /// Builder method to set the time of day.
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }
}

/// Wire form of a row as written to the persisted payload.
///
/// Dates render as `YYYY-MM-DD`, times as `HH:MM:SS` (null when absent),
/// so the payload stays readable and round-trips cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub date: String,
    pub time: Option<String>,
    pub subject_id: String,
    pub subject_name: String,
}

impl From<&ExamEntry> for SavedEntry {
    fn from(entry: &ExamEntry) -> Self {
        Self {
            date: entry.date.format("%Y-%m-%d").to_string(),
            time: entry.time.map(|t| t.format("%H:%M:%S").to_string()),
            subject_id: entry.subject_id.clone(),
            subject_name: entry.subject_name.clone(),
        }
    }
}

/// A row as found in a persisted payload, before repair.
///
/// Date and time are kept as raw JSON values because payloads written by
/// earlier serializers carried them as epoch-millisecond numbers or full
/// datetime strings rather than plain `YYYY-MM-DD` text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub date: Option<Value>,

    #[serde(default)]
    pub time: Option<Value>,

    #[serde(default)]
    pub subject_id: String,

    #[serde(default)]
    pub subject_name: String,
}

impl RawEntry {
    /// Repair the date field. `None` means the row is invalid.
    pub fn parse_date(&self) -> Option<NaiveDate> {
        match self.date.as_ref()? {
            Value::String(s) => parse_date_str(s),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.date_naive()),
            _ => None,
        }
    }

    /// Repair the time field. `None` means the time is absent.
    pub fn parse_time(&self) -> Option<NaiveTime> {
        match self.time.as_ref()? {
            Value::String(s) => parse_time_str(s),
            _ => None,
        }
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Parse a time-of-day string (`HH:MM`, with optional seconds and fraction).
pub fn parse_time_str(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    for format in ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, format) {
            return Some(t);
        }
    }
    None
}

/// Validate a subject code: letters, digits, `-` and `_` only.
pub fn is_valid_subject_id(s: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
    re.is_match(s)
}
