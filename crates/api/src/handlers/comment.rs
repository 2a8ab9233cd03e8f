//! Handlers for task comments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::comment::{CommentView, CreateComment};
use taskboard_core::types::DbId;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tasks/{id}/comments
pub async fn list_by_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentView>>>> {
    let comments = state.tracker.list_comments(auth.user_id, task_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/tasks/{id}/comments
///
/// The author is always the caller.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    ApiJson(input): ApiJson<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<CommentView>>)> {
    let comment = state
        .tracker
        .create_comment(auth.user_id, task_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CommentView>>> {
    let comment = state.tracker.get_comment(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: comment }))
}
