//! Caller-facing event operations, one function per public operation.
//!
//! This is the fail-closed boundary: store failures on the read paths are
//! logged and collapsed into empty successful responses, matching the
//! original service's behavior (the caller cannot tell a failure from a
//! genuinely empty result — kept deliberately, and always logged). The save
//! path is the exception and fails hard.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::events::filters::{normalize, EventFilterInput};
use crate::events::store::{EventQuery, EventStore};
use crate::events::trending::{rank_trending, TRENDING_SAMPLE_SIZE};
use crate::models::event::{Event, TrendingBadge};

/// How many upcoming events the homepage shows.
pub const FEATURED_LIMIT: i64 = 6;

#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    pub events: Vec<Event>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    /// `None` is the soft not-found contract; callers must check for null.
    pub event: Option<Event>,
}

#[derive(Debug, Serialize)]
pub struct FeaturedEventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct TrendingBadgesResponse {
    pub badges: Vec<TrendingBadge>,
}

#[derive(Debug, Serialize)]
pub struct ToggleSaveResponse {
    pub success: bool,
}

/// Lists approved events matching the caller's filters, with a total count of
/// the full filtered set. Validation errors propagate; store failures
/// collapse to an empty result.
pub async fn list_events(
    store: &dyn EventStore,
    input: &EventFilterInput,
    today: NaiveDate,
    page_size: i64,
) -> Result<ListEventsResponse, AppError> {
    let query = normalize(input, today, page_size)?;

    match store.list(&query).await {
        Ok(page) => Ok(ListEventsResponse {
            events: page.rows.into_iter().map(Event::from).collect(),
            total: page.total,
        }),
        Err(err) => {
            error!(error = %err, "Event listing failed; returning empty result");
            Ok(ListEventsResponse {
                events: Vec::new(),
                total: 0,
            })
        }
    }
}

/// Fetches a single event by id and bumps its view count.
///
/// The increment is best-effort: a failure is logged and never surfaced, and
/// the response carries the pre-increment snapshot already fetched (the
/// counter is approximate analytics, not worth a second read). Unknown ids
/// and store failures both resolve to `event: null`.
pub async fn get_event(store: &dyn EventStore, id: Uuid) -> EventDetailResponse {
    let row = match store.get(id).await {
        Ok(Some(row)) => row,
        Ok(None) => return EventDetailResponse { event: None },
        Err(err) => {
            error!(error = %err, event_id = %id, "Event fetch failed; returning null event");
            return EventDetailResponse { event: None };
        }
    };

    if let Err(err) = store.increment_view_count(id).await {
        warn!(error = %err, event_id = %id, "View count increment failed");
    }

    EventDetailResponse {
        event: Some(row.into()),
    }
}

/// Upcoming approved events for the homepage: today forward, soonest first.
pub async fn featured_events(store: &dyn EventStore, today: NaiveDate) -> FeaturedEventsResponse {
    match store.list(&EventQuery::upcoming(today, FEATURED_LIMIT)).await {
        Ok(page) => FeaturedEventsResponse {
            events: page.rows.into_iter().map(Event::from).collect(),
        },
        Err(err) => {
            error!(error = %err, "Featured events lookup failed; returning empty result");
            FeaturedEventsResponse { events: Vec::new() }
        }
    }
}

/// Ranks badges by popularity within the most-viewed sample.
pub async fn trending_badges(store: &dyn EventStore) -> TrendingBadgesResponse {
    match store.list(&EventQuery::most_viewed(TRENDING_SAMPLE_SIZE)).await {
        Ok(page) => TrendingBadgesResponse {
            badges: rank_trending(&page.rows),
        },
        Err(err) => {
            error!(error = %err, "Trending badges lookup failed; returning empty result");
            TrendingBadgesResponse { badges: Vec::new() }
        }
    }
}

/// Bumps an event's save count on behalf of a signed-in user.
///
/// Unlike the read paths this fails hard: no identity is Unauthorized, and a
/// store failure propagates, because the increment is the operation itself.
pub async fn toggle_save(
    store: &dyn EventStore,
    user: Option<AuthUser>,
    event_id: Uuid,
) -> Result<ToggleSaveResponse, AppError> {
    let user = user.ok_or(AppError::Unauthorized)?;

    if store.get(event_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Event {event_id} not found")));
    }
    store.increment_save_count(event_id).await?;

    info!(user_id = %user.id, event_id = %event_id, "Event saved");
    Ok(ToggleSaveResponse { success: true })
}
