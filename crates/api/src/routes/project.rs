//! Route definitions for the `/projects` resource, including the
//! project-scoped task collection.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, task};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// GET    /{id}/assigned-users     -> assigned_users
///
/// GET    /{id}/tasks              -> task::list_by_project
/// POST   /{id}/tasks              -> task::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/assigned-users", get(project::assigned_users))
        .route("/{id}/tasks", get(task::list_by_project).post(task::create))
}
