//! Schedule load/save/reset endpoints.
//!
//! The browser cookie is the only persistence, so every request carries the
//! whole table: load reconciles the cookie payload into a fresh table, save
//! validates the edited rows and writes the cookie back, reset clears it.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::CookieJar;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::countdown;
use crate::models::{is_valid_subject_id, parse_time_str, ExamEntry, SavedEntry};
use crate::schedule::Schedule;
use crate::store::CookieStore;

/// One table row as shown to the user, with the derived duration column.
#[derive(Debug, Serialize)]
pub struct ScheduleRow {
    pub date: String,
    pub time: Option<String>,
    pub subject_id: String,
    pub subject_name: String,
    /// Read-only, derived from the date
    pub duration: String,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub rows: Vec<ScheduleRow>,
    /// "cookie" when saved data was loaded, "default" otherwise
    pub source: &'static str,
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub rows: Vec<SavedEntry>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub saved: usize,
}

fn annotate(schedule: &Schedule, today: NaiveDate) -> Vec<ScheduleRow> {
    schedule
        .entries()
        .iter()
        .map(|entry| ScheduleRow {
            date: entry.date.format("%Y-%m-%d").to_string(),
            time: entry.time.map(|t| t.format("%H:%M").to_string()),
            subject_id: entry.subject_id.clone(),
            subject_name: entry.subject_name.clone(),
            duration: countdown(today, Some(entry.date)),
        })
        .collect()
}

/// GET /api/schedule
///
/// Reconciles whatever the cookie holds into a fresh default table. A
/// malformed cookie degrades to the default table plus a warning; it never
/// fails the request.
pub async fn load(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let now = Local::now();
    let today = now.date_naive();

    let store = CookieStore::new(jar);
    let mut schedule = Schedule::seeded(today, now.time());

    let (source, warning) = match schedule.load_from_store(&store, &state.config.cookie.name) {
        Ok(outcome) if outcome.changed() => ("cookie", None),
        Ok(_) => ("default", None),
        Err(e) => {
            warn!("Failed to load saved schedule: {}", e);
            ("default", Some(format!("Error loading saved data: {}", e)))
        }
    };

    Ok(Json(ScheduleResponse {
        rows: annotate(&schedule, today),
        source,
        warning,
    }))
}

/// POST /api/schedule
///
/// Validates the edited rows and persists them to the cookie.
pub async fn save(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SaveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut entries = Vec::with_capacity(req.rows.len());
    for (index, row) in req.rows.iter().enumerate() {
        entries.push(validate_row(index, row)?);
    }

    let schedule = Schedule::from_entries(entries);
    let mut store = CookieStore::new(jar);
    schedule
        .save_to_store(&mut store, &state.config.cookie.name)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let saved = schedule.entries().len();
    info!("Saved {} row(s) to cookie", saved);
    Ok((store.into_jar(), Json(SaveResponse { saved })))
}

/// POST /api/schedule/reset
///
/// Clears the cookie and returns the seeded default table.
pub async fn reset(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let now = Local::now();
    let today = now.date_naive();

    let mut store = CookieStore::new(jar);
    let schedule = Schedule::reset_store(&mut store, &state.config.cookie.name, today, now.time())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("Schedule reset to default");
    Ok((
        store.into_jar(),
        Json(ScheduleResponse {
            rows: annotate(&schedule, today),
            source: "default",
            warning: None,
        }),
    ))
}

/// Reject rows that fail the edit-boundary rules before they reach the
/// table. An unparseable time is not an error; the field just goes absent.
fn validate_row(index: usize, row: &SavedEntry) -> Result<ExamEntry, ApiError> {
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!(
            "Row {}: invalid date {:?} (expected YYYY-MM-DD)",
            index + 1,
            row.date
        ))
    })?;

    if !is_valid_subject_id(&row.subject_id) {
        return Err(ApiError::BadRequest(format!(
            "Row {}: invalid subject id {:?}",
            index + 1,
            row.subject_id
        )));
    }

    if row.subject_name.trim().is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Row {}: subject name is required",
            index + 1
        )));
    }

    let mut entry = ExamEntry::new(date, row.subject_id.clone(), row.subject_name.clone());
    if let Some(time) = row.time.as_deref().and_then(parse_time_str) {
        entry = entry.with_time(time);
    }
    Ok(entry)
}
