use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::session_token;
use crate::errors::AppError;
use crate::events::filters::{EventFilterInput, DEFAULT_PAGE_SIZE, SEARCH_PAGE_SIZE};
use crate::events::service::{
    self, EventDetailResponse, FeaturedEventsResponse, ListEventsResponse, ToggleSaveResponse,
    TrendingBadgesResponse,
};
use crate::state::AppState;

/// GET /api/v1/events
pub async fn handle_list_events(
    State(state): State<AppState>,
    Query(input): Query<EventFilterInput>,
) -> Result<Json<ListEventsResponse>, AppError> {
    let today = Utc::now().date_naive();
    let response =
        service::list_events(state.store.as_ref(), &input, today, DEFAULT_PAGE_SIZE).await?;
    Ok(Json(response))
}

/// GET /api/v1/events/search — same operation at the UI search page size.
pub async fn handle_search_events(
    State(state): State<AppState>,
    Query(input): Query<EventFilterInput>,
) -> Result<Json<ListEventsResponse>, AppError> {
    let today = Utc::now().date_naive();
    let response =
        service::list_events(state.store.as_ref(), &input, today, SEARCH_PAGE_SIZE).await?;
    Ok(Json(response))
}

/// GET /api/v1/events/:id
pub async fn handle_get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<EventDetailResponse> {
    Json(service::get_event(state.store.as_ref(), id).await)
}

/// GET /api/v1/events/featured
pub async fn handle_featured_events(State(state): State<AppState>) -> Json<FeaturedEventsResponse> {
    let today = Utc::now().date_naive();
    Json(service::featured_events(state.store.as_ref(), today).await)
}

/// GET /api/v1/badges/trending
pub async fn handle_trending_badges(State(state): State<AppState>) -> Json<TrendingBadgesResponse> {
    Json(service::trending_badges(state.store.as_ref()).await)
}

/// POST /api/v1/events/:id/save
pub async fn handle_toggle_save(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ToggleSaveResponse>, AppError> {
    let user = match session_token(&headers) {
        Some(token) => state.auth.current_user(&token).await?,
        None => None,
    };
    let response = service::toggle_save(state.store.as_ref(), user, id).await?;
    Ok(Json(response))
}
