use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::ConnectionDirectory;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: newsdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Open realtime connections, keyed by user.
    pub connections: Arc<ConnectionDirectory>,
    /// Event bus for review events.
    pub event_bus: Arc<newsdesk_events::EventBus>,
}
