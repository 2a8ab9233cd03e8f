//! Comment snapshot and DTOs.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    pub task_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /tasks/{id}/comments`.
///
/// Only `text` is read. Any author field in the payload is ignored; the
/// author is always the authenticated caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateComment {
    #[serde(default)]
    pub text: String,
}

/// Insert DTO handed to the repository.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub task_id: DbId,
    pub author_id: DbId,
    pub text: String,
}

/// Comment as returned to clients, with the author's username resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: DbId,
    pub task_id: DbId,
    pub author_id: DbId,
    /// Author username.
    pub user: String,
    pub text: String,
    pub created_at: Timestamp,
}

impl CommentView {
    pub fn new(comment: Comment, author_username: String) -> Self {
        Self {
            id: comment.id,
            task_id: comment.task_id,
            author_id: comment.author_id,
            user: author_username,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}
