use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Moderation state required for an event to be publicly visible.
pub const APPROVED_STATUS: &str = "approved";

/// An event row as stored. `status` gates public visibility; `view_count` and
/// `save_count` are monotonic engagement counters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub created_by: Uuid,
    pub badge_name: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    /// Free-text time ("10:00 AM - 2:00 PM"), not a structured time.
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub is_virtual: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub subject_area: Option<String>,
    pub is_eagle_required: bool,
    pub prerequisites: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub registration_url: Option<String>,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
    pub status: String,
    pub view_count: i64,
    pub save_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The externally-visible event representation, serialized in camelCase.
///
/// A pure field-by-field projection of `EventRow`. Moderation state and owner
/// identity stay server-side; every public read path is approved-only already.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub badge_name: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: Option<String>,
    pub location: Option<String>,
    pub is_virtual: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub subject_area: Option<String>,
    pub is_eagle_required: bool,
    pub prerequisites: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub registration_url: Option<String>,
    pub source_url: Option<String>,
    pub image_url: Option<String>,
    pub view_count: i64,
    pub save_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            badge_name: row.badge_name,
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            event_time: row.event_time,
            location: row.location,
            is_virtual: row.is_virtual,
            latitude: row.latitude,
            longitude: row.longitude,
            subject_area: row.subject_area,
            is_eagle_required: row.is_eagle_required,
            prerequisites: row.prerequisites,
            organizer_name: row.organizer_name,
            organizer_contact: row.organizer_contact,
            registration_url: row.registration_url,
            source_url: row.source_url,
            image_url: row.image_url,
            view_count: row.view_count,
            save_count: row.save_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A badge ranked by how many classes for it appear in the trending sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingBadge {
    pub name: String,
    pub class_count: i64,
    pub is_eagle: bool,
    pub subject_area: Option<String>,
}
