//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskboard_core::task::{NewTask, TaskPriority, TaskStatus, ValidatedTaskPatch};
use taskboard_core::types::DbId;

use crate::models::task::TaskRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, description, status, priority, \
                       deadline, assigned_to, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task and its initial comment, if any, in one
    /// transaction. Returns the created task row.
    pub async fn create(pool: &PgPool, input: &NewTask) -> Result<TaskRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tasks
                (project_id, title, description, status, priority, deadline, assigned_to)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.deadline)
            .bind(input.assigned_to)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(first) = &input.initial_comment {
            sqlx::query("INSERT INTO comments (task_id, author_id, text) VALUES ($1, $2, $3)")
                .bind(row.id)
                .bind(first.author_id)
                .bind(&first.text)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TaskRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks belonging to a project ordered by ID.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TaskRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Write the fields present in `patch`; absent ones keep the value in
    /// the row at update time. `updated_at` is set by trigger.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &ValidatedTaskPatch,
    ) -> Result<Option<TaskRow>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                status = COALESCE($2, status),
                priority = COALESCE($3, priority),
                deadline = COALESCE($4, deadline)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .bind(patch.status.map(TaskStatus::as_str))
            .bind(patch.priority.map(TaskPriority::as_str))
            .bind(patch.deadline)
            .fetch_optional(pool)
            .await
    }
}
