//! Repository for the `comments` table.

use sqlx::PgPool;
use taskboard_core::comment::NewComment;
use taskboard_core::types::DbId;

use crate::models::comment::CommentRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, task_id, author_id, text, created_at";

/// Provides create and read operations for comments. Comments are immutable.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewComment) -> Result<CommentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (task_id, author_id, text)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(input.task_id)
            .bind(input.author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CommentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List comments on a task, oldest first.
    pub async fn list_by_task(pool: &PgPool, task_id: DbId) -> Result<Vec<CommentRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM comments WHERE task_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, CommentRow>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}
