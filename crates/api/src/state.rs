use std::sync::Arc;

use taskboard_core::tracker::Tracker;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the tracker holds its store behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Domain operations over the configured store.
    pub tracker: Tracker,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
}
