//! # Exam Tracker
//!
//! A personal web tool for keeping an exam schedule. The table of exam
//! dates, subject codes, and subject names lives in a browser cookie; the
//! server only reconciles, annotates, and serves it.
//!
//! ## Architecture
//!
//! - **models**: Exam table row and its wire forms
//! - **calculate**: Relative-time display ("In 1 month and 15 days")
//! - **schedule**: Table load/normalize/save/reset core
//! - **store**: Key/value payload store seam (cookie, in-memory)
//! - **api**: REST endpoints and the static table editor
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod schedule;
pub mod store;

pub use models::*;
