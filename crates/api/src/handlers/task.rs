//! Handlers for tasks, both project-scoped and by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::task::{CreateTask, Task, TaskDetail, TaskPatch};
use taskboard_core::types::DbId;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/tasks
///
/// Each task carries its assignee and comments, as in the task detail.
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TaskDetail>>>> {
    let tasks = state.tracker.list_tasks(auth.user_id, project_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/projects/{id}/tasks
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ApiJson(input): ApiJson<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let task = state
        .tracker
        .create_task(auth.user_id, project_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskDetail>>> {
    let detail = state.tracker.task_detail(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/tasks/{id}/status
///
/// Any of `status`, `priority`, `deadline`. One invalid field rejects all.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ApiJson(patch): ApiJson<TaskPatch>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = state
        .tracker
        .update_task_status(auth.user_id, id, &patch)
        .await?;
    Ok(Json(DataResponse { data: task }))
}
