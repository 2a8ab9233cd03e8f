//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use taskboard_core::user::PublicUser;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users
///
/// Every account, for picking team members and assignees.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PublicUser>>>> {
    let users = state.tracker.list_users().await?;
    Ok(Json(DataResponse { data: users }))
}
