//! Filter Normalizer — converts raw, partially-populated search input into a
//! canonical `EventQuery` ready for execution.
//!
//! All validation of caller-supplied filter state happens here, before
//! anything reaches the store: date strings parse here (so malformed input
//! surfaces as a `ValidationError` instead of a framework rejection),
//! timeframe shortcuts expand here, and pagination math happens here.

use chrono::{Days, Months, NaiveDate};
use serde::Deserialize;

use crate::errors::AppError;
use crate::events::store::{EventOrder, EventQuery};

/// Page size for the generic listing operation.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Page size used by the UI search page.
pub const SEARCH_PAGE_SIZE: i64 = 12;
/// Hard ceiling on caller-supplied page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw filter input as it arrives on the wire. Every field is optional;
/// blank strings are treated as absent during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventFilterInput {
    /// Free-text search, matched as a substring of the badge name only.
    pub query: Option<String>,
    pub badge_name: Option<String>,
    pub subject_area: Option<String>,
    pub is_virtual: Option<bool>,
    pub is_eagle_required: Option<bool>,
    /// ISO date (`YYYY-MM-DD`). Parsed during normalization.
    pub start_date: Option<String>,
    /// ISO date (`YYYY-MM-DD`). Parsed during normalization.
    pub end_date: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Named shortcut that expands to an explicit date range at normalization
/// time. Ignored whenever an explicit date is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    Month,
}

/// Normalizes filter input into a canonical query descriptor.
///
/// Rules:
/// - blank strings become absent fields
/// - explicit dates must parse as `YYYY-MM-DD` or normalization fails, even
///   when a timeframe shortcut is also present
/// - the timeframe shortcut applies only when neither explicit date is given
/// - `page < 1` and `limit` outside `[1, MAX_PAGE_SIZE]` are rejected
pub fn normalize(
    input: &EventFilterInput,
    today: NaiveDate,
    page_size: i64,
) -> Result<EventQuery, AppError> {
    let limit = input.limit.unwrap_or(page_size);
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let page = input.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::Validation(
            "page must be a positive integer".to_string(),
        ));
    }
    let offset = (page - 1) * limit;

    // Malformed explicit dates fail even if a timeframe would win below.
    let explicit_start = parse_date(&input.start_date, "startDate")?;
    let explicit_end = parse_date(&input.end_date, "endDate")?;

    let (start_date, end_date) = if explicit_start.is_some() || explicit_end.is_some() {
        // No merging of partial explicit dates with derived ones.
        (explicit_start, explicit_end)
    } else {
        match input.timeframe {
            Some(Timeframe::Week) => (Some(today), Some(week_after(today))),
            Some(Timeframe::Month) => (Some(today), Some(month_after(today))),
            None => (None, None),
        }
    };

    Ok(EventQuery {
        query: non_blank(&input.query),
        badge_name: non_blank(&input.badge_name),
        subject_area: non_blank(&input.subject_area),
        is_virtual: input.is_virtual,
        is_eagle_required: input.is_eagle_required,
        start_date,
        end_date,
        order: EventOrder::DateAsc,
        limit,
        offset,
    })
}

/// One calendar month later; the day clamps to the end of a shorter target
/// month (Jan 31 -> Feb 28/29).
fn month_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX)
}

fn week_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX)
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn parse_date(value: &Option<String>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    let Some(raw) = value.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| AppError::Validation(format!("{field} must be a YYYY-MM-DD date")))
}
