//! Route definitions for the `/tasks` resource and its comments.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::{comment, task};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}/status     -> update_status
/// GET    /{id}/comments   -> comment::list_by_task
/// POST   /{id}/comments   -> comment::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(task::get_by_id))
        .route("/{id}/status", patch(task::update_status))
        .route(
            "/{id}/comments",
            get(comment::list_by_task).post(comment::create),
        )
}
