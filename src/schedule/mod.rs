//! The exam table and its load/save/reset lifecycle.
//!
//! The persisted payload is whatever a previous session left in the
//! client-side store: possibly absent, stale, or malformed. Loading repairs
//! what it can (rows with unparseable dates are dropped, bad times become
//! absent) and never clobbers a table the user has already edited.

use chrono::{NaiveDate, NaiveTime, Timelike};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{ExamEntry, RawEntry, SavedEntry};
use crate::store::{PayloadStore, StoreError};

/// Subject seeded into a fresh table.
pub const DEFAULT_SUBJECT_ID: &str = "204111";
pub const DEFAULT_SUBJECT_NAME: &str = "Fundamentals of Programming";

/// Errors that can occur while loading or saving the table.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// What a load attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Payload replaced the table; holds the surviving row count.
    Loaded(usize),
    /// Nothing in the store.
    NoPayload,
    /// The table already holds loaded or edited data; left alone.
    AlreadyLoaded,
}

impl LoadOutcome {
    /// Whether the presentation layer needs to re-render.
    pub fn changed(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Ordered exam table plus the flag guarding the load race.
///
/// `is_default` is true only while the table still holds the seeded row.
/// The store's value can arrive after the first render, so a load is only
/// allowed to replace a table that is still default; once cleared, further
/// loads are no-ops and user edits survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<ExamEntry>,
    is_default: bool,
}

impl Schedule {
    /// Fresh table with the single seeded example row.
    ///
    /// The seeded time is truncated to the minute, matching the granularity
    /// the editor works at.
    pub fn seeded(today: NaiveDate, now: NaiveTime) -> Self {
        let minute = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now);
        Self {
            entries: vec![
                ExamEntry::new(today, DEFAULT_SUBJECT_ID, DEFAULT_SUBJECT_NAME).with_time(minute),
            ],
            is_default: true,
        }
    }

    /// Table built from user-edited rows. Never treated as default.
    pub fn from_entries(entries: Vec<ExamEntry>) -> Self {
        Self {
            entries,
            is_default: false,
        }
    }

    pub fn entries(&self) -> &[ExamEntry] {
        &self.entries
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Load a serialized payload into the table, exactly once.
    ///
    /// Skips when there is no payload or when the table is no longer
    /// default. A structurally invalid payload is an error and leaves the
    /// table untouched.
    pub fn load_payload(&mut self, payload: Option<&str>) -> Result<LoadOutcome, ScheduleError> {
        let payload = match payload {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Ok(LoadOutcome::NoPayload),
        };

        if !self.is_default {
            debug!("Table already loaded; skipping payload");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let records: Vec<RawEntry> = serde_json::from_str(payload)?;
        Ok(self.replace_with(records))
    }

    /// Same contract as [`load_payload`](Self::load_payload) for a payload
    /// that arrives already parsed into records.
    pub fn load_records(&mut self, records: Vec<RawEntry>) -> LoadOutcome {
        if !self.is_default {
            return LoadOutcome::AlreadyLoaded;
        }
        self.replace_with(records)
    }

    fn replace_with(&mut self, records: Vec<RawEntry>) -> LoadOutcome {
        self.entries = normalize_records(records);
        self.is_default = false;
        LoadOutcome::Loaded(self.entries.len())
    }

    /// Serialize the table for the store: a JSON record array in table
    /// order, dates as `YYYY-MM-DD`, times as `HH:MM:SS` or null.
    pub fn to_payload(&self) -> Result<String, ScheduleError> {
        let records: Vec<SavedEntry> = self.entries.iter().map(SavedEntry::from).collect();
        Ok(serde_json::to_string(&records)?)
    }

    /// Fetch the payload under `key` and reconcile it into the table.
    pub fn load_from_store<S: PayloadStore>(
        &mut self,
        store: &S,
        key: &str,
    ) -> Result<LoadOutcome, ScheduleError> {
        let payload = store.get(key)?;
        self.load_payload(payload.as_deref())
    }

    /// Write the table's payload under `key`.
    pub fn save_to_store<S: PayloadStore>(
        &self,
        store: &mut S,
        key: &str,
    ) -> Result<(), ScheduleError> {
        store.set(key, self.to_payload()?)?;
        Ok(())
    }

    /// Clear the persisted payload and return a fresh seeded table.
    pub fn reset_store<S: PayloadStore>(
        store: &mut S,
        key: &str,
        today: NaiveDate,
        now: NaiveTime,
    ) -> Result<Schedule, ScheduleError> {
        store.delete(key)?;
        Ok(Schedule::seeded(today, now))
    }
}

/// Repair raw records into valid rows, preserving order.
///
/// Rows without a parseable date are dropped; an unparseable time only
/// loses the time field.
fn normalize_records(records: Vec<RawEntry>) -> Vec<ExamEntry> {
    records
        .into_iter()
        .filter_map(|record| {
            let Some(date) = record.parse_date() else {
                warn!(
                    subject_id = %record.subject_id,
                    "Dropping row with unparseable date"
                );
                return None;
            };
            Some(ExamEntry {
                date,
                time: record.parse_time(),
                subject_id: record.subject_id,
                subject_name: record.subject_name,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Days;
    use pretty_assertions::assert_eq;

    const KEY: &str = "subject_table_data";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    fn sample() -> Schedule {
        Schedule::from_entries(vec![
            ExamEntry::new(today() + Days::new(10), "204111", "Fundamentals of Programming")
                .with_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
            ExamEntry::new(today() + Days::new(12), "261111", "Object Oriented Programming"),
            // Duplicate subject ids are allowed
            ExamEntry::new(today() + Days::new(20), "204111", "Retake"),
        ])
    }

    #[test]
    fn test_seeded_has_one_default_row() {
        let schedule = Schedule::seeded(today(), noon());
        assert!(schedule.is_default());
        assert_eq!(schedule.entries().len(), 1);

        let row = &schedule.entries()[0];
        assert_eq!(row.date, today());
        assert_eq!(row.subject_id, DEFAULT_SUBJECT_ID);
        assert_eq!(row.subject_name, DEFAULT_SUBJECT_NAME);
        assert_eq!(row.time, Some(noon()));
    }

    #[test]
    fn test_seeded_time_truncated_to_minute() {
        let schedule = Schedule::seeded(
            today(),
            NaiveTime::from_hms_opt(9, 41, 27).unwrap(),
        );
        assert_eq!(
            schedule.entries()[0].time,
            NaiveTime::from_hms_opt(9, 41, 0)
        );
    }

    #[test]
    fn test_round_trip_preserves_rows() {
        let original = sample();
        let payload = original.to_payload().unwrap();

        let mut loaded = Schedule::seeded(today(), noon());
        let outcome = loaded.load_payload(Some(&payload)).unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded(3));
        assert_eq!(loaded.entries(), original.entries());
        assert!(!loaded.is_default());
    }

    #[test]
    fn test_load_skips_when_no_payload() {
        let mut schedule = Schedule::seeded(today(), noon());
        assert_eq!(schedule.load_payload(None).unwrap(), LoadOutcome::NoPayload);
        assert_eq!(
            schedule.load_payload(Some("  ")).unwrap(),
            LoadOutcome::NoPayload
        );
        assert!(schedule.is_default());
    }

    #[test]
    fn test_second_load_is_a_no_op() {
        let payload = sample().to_payload().unwrap();
        let other = Schedule::from_entries(vec![ExamEntry::new(today(), "999", "Other")])
            .to_payload()
            .unwrap();

        let mut schedule = Schedule::seeded(today(), noon());
        assert!(schedule.load_payload(Some(&payload)).unwrap().changed());

        let before = schedule.clone();
        let outcome = schedule.load_payload(Some(&other)).unwrap();
        assert_eq!(outcome, LoadOutcome::AlreadyLoaded);
        assert_eq!(schedule, before);
    }

    #[test]
    fn test_malformed_payload_leaves_table_untouched() {
        let mut schedule = Schedule::seeded(today(), noon());
        let before = schedule.clone();

        let result = schedule.load_payload(Some("{not json"));
        assert!(matches!(result, Err(ScheduleError::MalformedPayload(_))));
        assert_eq!(schedule, before);
        assert!(schedule.is_default());
    }

    #[test]
    fn test_rows_with_bad_dates_are_dropped_in_order() {
        let payload = r#"[
            {"date":"2026-04-01","time":"09:00","subject_id":"A1","subject_name":"First"},
            {"date":"garbage","time":"10:00","subject_id":"BAD","subject_name":"Dropped"},
            {"date":1773532800000,"subject_id":"B2","subject_name":"Epoch"},
            {"date":"2026-05-01T08:00:00","time":"NaT","subject_id":"C3","subject_name":"Third"}
        ]"#;

        let mut schedule = Schedule::seeded(today(), noon());
        let outcome = schedule.load_payload(Some(payload)).unwrap();

        assert_eq!(outcome, LoadOutcome::Loaded(3));
        let ids: Vec<&str> = schedule
            .entries()
            .iter()
            .map(|e| e.subject_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A1", "B2", "C3"]);
        // Bad time degraded to absent, row kept
        assert_eq!(schedule.entries()[2].time, None);
    }

    #[test]
    fn test_load_records_guards_default_flag() {
        let mut schedule = Schedule::from_entries(vec![ExamEntry::new(today(), "X", "Edited")]);
        let outcome = schedule.load_records(vec![RawEntry::default()]);
        assert_eq!(outcome, LoadOutcome::AlreadyLoaded);
        assert_eq!(schedule.entries().len(), 1);
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryStore::new();
        sample().save_to_store(&mut store, KEY).unwrap();

        let mut loaded = Schedule::seeded(today(), noon());
        let outcome = loaded.load_from_store(&store, KEY).unwrap();

        assert!(outcome.changed());
        assert_eq!(loaded.entries(), sample().entries());
    }

    #[test]
    fn test_load_from_empty_store() {
        let store = MemoryStore::new();
        let mut schedule = Schedule::seeded(today(), noon());
        assert_eq!(
            schedule.load_from_store(&store, KEY).unwrap(),
            LoadOutcome::NoPayload
        );
    }

    #[test]
    fn test_reset_clears_store_and_reseeds() {
        let mut store = MemoryStore::new();
        sample().save_to_store(&mut store, KEY).unwrap();

        let schedule = Schedule::reset_store(&mut store, KEY, today(), noon()).unwrap();
        assert!(schedule.is_default());
        assert_eq!(schedule.entries().len(), 1);
        assert_eq!(store.get(KEY).unwrap(), None);

        // Idempotent
        let again = Schedule::reset_store(&mut store, KEY, today(), noon()).unwrap();
        assert_eq!(again, schedule);
        assert_eq!(store.get(KEY).unwrap(), None);
    }

    #[test]
    fn test_payload_shape() {
        let schedule = Schedule::from_entries(vec![ExamEntry::new(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            "204111",
            "Fundamentals of Programming",
        )]);

        let payload = schedule.to_payload().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value[0]["date"], "2026-04-01");
        assert_eq!(value[0]["time"], serde_json::Value::Null);
        assert_eq!(value[0]["subject_id"], "204111");
    }
}
