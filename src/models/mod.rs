//! Core data structures for the exam table.

mod entry;

pub use entry::{is_valid_subject_id, parse_time_str, ExamEntry, RawEntry, SavedEntry};
