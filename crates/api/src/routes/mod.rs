pub mod auth;
pub mod comment;
pub mod health;
pub mod project;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
///
/// /users                                           list
///
/// /projects                                        list, create
/// /projects/{id}                                   detail, update, delete
/// /projects/{id}/assigned-users                    members
/// /projects/{id}/tasks                             list, create
///
/// /tasks/{id}                                      detail
/// /tasks/{id}/status                               partial update (PATCH)
/// /tasks/{id}/comments                             list, create
///
/// /comments/{id}                                   get
/// ```
///
/// Everything except `/auth/*` requires a Bearer access token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/comments", comment::router())
}
