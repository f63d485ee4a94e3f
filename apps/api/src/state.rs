use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::events::store::EventStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both external collaborators sit behind trait objects so tests can substitute
/// in-memory fakes without a running database or auth provider.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub auth: Arc<dyn AuthProvider>,
}
