//! Calendar route: echo the picked date with a readable label.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use super::ApiError;
use crate::error::ErrorCode;
use crate::services::pet::DATE_FORMAT;
use crate::state::AppState;

/// `Mon Oct 19 2026`
const LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[weekday repr:short] [month repr:short] [day] [year]");

#[derive(Debug, thiserror::Error)]
#[error("not a valid date: {0}")]
pub struct InvalidDate(String);

impl ErrorCode for InvalidDate {
    fn error_code(&self) -> &'static str {
        "E_DATE"
    }
}

impl From<InvalidDate> for ApiError {
    fn from(err: InvalidDate) -> Self {
        Self::new(StatusCode::BAD_REQUEST, &err)
    }
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalendarView {
    pub date: String,
    pub label: String,
}

/// Parse the picked date, defaulting to `today` when absent or blank.
pub(crate) fn selected_date(raw: Option<&str>, today: Date) -> Result<Date, InvalidDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Date::parse(raw, DATE_FORMAT).map_err(|_| InvalidDate(raw.to_owned())),
        None => Ok(today),
    }
}

pub(crate) fn date_view(date: Date) -> Result<CalendarView, InvalidDate> {
    let invalid = |_| InvalidDate(date.to_string());
    Ok(CalendarView {
        date: date.format(DATE_FORMAT).map_err(invalid)?,
        label: date.format(LABEL_FORMAT).map_err(invalid)?,
    })
}

/// `GET /calendar?date=YYYY-MM-DD`
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarView>, ApiError> {
    let date = selected_date(query.date.as_deref(), state.today())?;
    Ok(Json(date_view(date)?))
}

#[cfg(test)]
#[path = "calendar_test.rs"]
mod tests;
