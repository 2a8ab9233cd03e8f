//! Rows from the `comments` table.

use sqlx::FromRow;
use taskboard_core::comment::Comment;
use taskboard_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: DbId,
    pub task_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            task_id: row.task_id,
            author_id: row.author_id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}
