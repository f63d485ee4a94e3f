//! Event Store — the single seam between the query pipeline and PostgreSQL.
//!
//! `EventStore` is carried in `AppState` as `Arc<dyn EventStore>`; the
//! production implementation is `PgEventStore`, and service-level tests run
//! against the in-memory store in [`testing`].
//!
//! The moderation invariant lives here: every `list` call writes the
//! approved-status predicate before any caller-supplied predicate, so no
//! filter combination can surface unapproved rows.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::events::filters::DEFAULT_PAGE_SIZE;
use crate::models::event::{EventRow, APPROVED_STATUS};

/// Canonical query descriptor produced by the filter normalizer.
/// Optional fields are either present-and-valid or entirely absent.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    /// Substring match against the badge name (case-insensitive).
    pub query: Option<String>,
    pub badge_name: Option<String>,
    pub subject_area: Option<String>,
    pub is_virtual: Option<bool>,
    pub is_eagle_required: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub order: EventOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for EventQuery {
    fn default() -> Self {
        EventQuery {
            query: None,
            badge_name: None,
            subject_area: None,
            is_virtual: None,
            is_eagle_required: None,
            start_date: None,
            end_date: None,
            order: EventOrder::DateAsc,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl EventQuery {
    /// Events from `today` forward, soonest first.
    pub fn upcoming(today: NaiveDate, limit: i64) -> Self {
        EventQuery {
            start_date: Some(today),
            limit,
            ..Default::default()
        }
    }

    /// The most-viewed events, for the trending sample.
    pub fn most_viewed(limit: i64) -> Self {
        EventQuery {
            order: EventOrder::ViewCountDesc,
            limit,
            ..Default::default()
        }
    }
}

/// Result ordering. Ties always break by insertion order then identity, so
/// repeated queries page through a stable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOrder {
    #[default]
    DateAsc,
    ViewCountDesc,
}

/// One page of results plus the total size of the filtered set (independent
/// of limit/offset).
#[derive(Debug, Clone)]
pub struct EventPage {
    pub rows: Vec<EventRow>,
    pub total: i64,
}

/// Persistence operations the event pipeline needs. The counter updates are
/// the only writes in scope and must be atomic single increments.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self, query: &EventQuery) -> Result<EventPage, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<EventRow>, AppError>;
    async fn increment_view_count(&self, id: Uuid) -> Result<(), AppError>;
    async fn increment_save_count(&self, id: Uuid) -> Result<(), AppError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list(&self, query: &EventQuery) -> Result<EventPage, AppError> {
        // Exactly two statements per call: full count, then the page.
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_predicates(&mut count_query, query);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query = QueryBuilder::<Postgres>::new("SELECT * FROM events");
        push_predicates(&mut page_query, query);
        match query.order {
            EventOrder::DateAsc => {
                page_query.push(" ORDER BY event_date ASC, created_at ASC, id ASC")
            }
            EventOrder::ViewCountDesc => {
                page_query.push(" ORDER BY view_count DESC, created_at ASC, id ASC")
            }
        };
        page_query.push(" LIMIT ");
        page_query.push_bind(query.limit);
        page_query.push(" OFFSET ");
        page_query.push_bind(query.offset);

        let rows = page_query
            .build_query_as::<EventRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(EventPage { rows, total })
    }

    async fn get(&self, id: Uuid) -> Result<Option<EventRow>, AppError> {
        Ok(
            sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE events SET view_count = view_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {id} not found")));
        }
        Ok(())
    }

    async fn increment_save_count(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE events SET save_count = save_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {id} not found")));
        }
        Ok(())
    }
}

/// Writes the WHERE clause for a canonical query. The approved-status
/// predicate is emitted first and unconditionally; caller predicates are
/// ANDed after it.
fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, query: &EventQuery) {
    builder.push(" WHERE status = ");
    builder.push_bind(APPROVED_STATUS);

    if let Some(term) = &query.query {
        builder.push(" AND badge_name ILIKE ");
        builder.push_bind(format!("%{}%", escape_like(term)));
    }
    if let Some(badge_name) = &query.badge_name {
        builder.push(" AND badge_name = ");
        builder.push_bind(badge_name.clone());
    }
    if let Some(subject_area) = &query.subject_area {
        builder.push(" AND subject_area = ");
        builder.push_bind(subject_area.clone());
    }
    if let Some(is_virtual) = query.is_virtual {
        builder.push(" AND is_virtual = ");
        builder.push_bind(is_virtual);
    }
    if let Some(is_eagle_required) = query.is_eagle_required {
        builder.push(" AND is_eagle_required = ");
        builder.push_bind(is_eagle_required);
    }
    if let Some(start_date) = query.start_date {
        builder.push(" AND event_date >= ");
        builder.push_bind(start_date);
    }
    if let Some(end_date) = query.end_date {
        builder.push(" AND event_date <= ");
        builder.push_bind(end_date);
    }
}

/// Escapes LIKE wildcards so free-text input matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
pub mod testing {
    //! In-memory `EventStore` mirroring PostgreSQL semantics (including the
    //! approved-status gate and stable ordering) for service-level tests.

    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    pub struct MemoryEventStore {
        rows: Mutex<Vec<EventRow>>,
        fail: bool,
    }

    impl MemoryEventStore {
        pub fn new(rows: Vec<EventRow>) -> Self {
            Self {
                rows: Mutex::new(rows),
                fail: false,
            }
        }

        /// A store whose every operation fails, for exercising the
        /// fail-closed boundary.
        pub fn failing() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        /// Current state of a stored row, for asserting counter updates.
        pub fn row(&self, id: Uuid) -> Option<EventRow> {
            self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned()
        }

        fn check(&self) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Database(sqlx::Error::PoolClosed));
            }
            Ok(())
        }

        fn matches(row: &EventRow, query: &EventQuery) -> bool {
            if row.status != APPROVED_STATUS {
                return false;
            }
            if let Some(term) = &query.query {
                if !row
                    .badge_name
                    .to_lowercase()
                    .contains(&term.to_lowercase())
                {
                    return false;
                }
            }
            if let Some(badge_name) = &query.badge_name {
                if &row.badge_name != badge_name {
                    return false;
                }
            }
            if let Some(subject_area) = &query.subject_area {
                if row.subject_area.as_deref() != Some(subject_area.as_str()) {
                    return false;
                }
            }
            if let Some(is_virtual) = query.is_virtual {
                if row.is_virtual != is_virtual {
                    return false;
                }
            }
            if let Some(is_eagle_required) = query.is_eagle_required {
                if row.is_eagle_required != is_eagle_required {
                    return false;
                }
            }
            if let Some(start_date) = query.start_date {
                if row.event_date < start_date {
                    return false;
                }
            }
            if let Some(end_date) = query.end_date {
                if row.event_date > end_date {
                    return false;
                }
            }
            true
        }

        fn increment<F>(&self, id: Uuid, apply: F) -> Result<(), AppError>
        where
            F: FnOnce(&mut EventRow),
        {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|r| r.id == id) {
                Some(row) => {
                    apply(row);
                    row.updated_at = Utc::now();
                    Ok(())
                }
                None => Err(AppError::NotFound(format!("Event {id} not found"))),
            }
        }
    }

    #[async_trait]
    impl EventStore for MemoryEventStore {
        async fn list(&self, query: &EventQuery) -> Result<EventPage, AppError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            let mut matched: Vec<EventRow> = rows
                .iter()
                .filter(|row| Self::matches(row, query))
                .cloned()
                .collect();

            match query.order {
                EventOrder::DateAsc => matched.sort_by(|a, b| {
                    (a.event_date, a.created_at, a.id).cmp(&(b.event_date, b.created_at, b.id))
                }),
                EventOrder::ViewCountDesc => matched.sort_by(|a, b| {
                    b.view_count
                        .cmp(&a.view_count)
                        .then_with(|| (a.created_at, a.id).cmp(&(b.created_at, b.id)))
                }),
            }

            let total = matched.len() as i64;
            let page = matched
                .into_iter()
                .skip(query.offset as usize)
                .take(query.limit as usize)
                .collect();
            Ok(EventPage { rows: page, total })
        }

        async fn get(&self, id: Uuid) -> Result<Option<EventRow>, AppError> {
            self.check()?;
            Ok(self.row(id))
        }

        async fn increment_view_count(&self, id: Uuid) -> Result<(), AppError> {
            self.increment(id, |row| row.view_count += 1)
        }

        async fn increment_save_count(&self, id: Uuid) -> Result<(), AppError> {
            self.increment(id, |row| row.save_count += 1)
        }
    }

    /// An approved event row with the given badge and date; tests mutate the
    /// fields they care about.
    pub fn event_row(badge_name: &str, event_date: NaiveDate) -> EventRow {
        let now = Utc::now();
        EventRow {
            id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            badge_name: badge_name.to_string(),
            title: format!("{badge_name} Merit Badge Class"),
            description: None,
            event_date,
            event_time: None,
            location: None,
            is_virtual: false,
            latitude: None,
            longitude: None,
            subject_area: None,
            is_eagle_required: false,
            prerequisites: None,
            organizer_name: None,
            organizer_contact: None,
            registration_url: None,
            source_url: None,
            image_url: None,
            status: APPROVED_STATUS.to_string(),
            view_count: 0,
            save_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
