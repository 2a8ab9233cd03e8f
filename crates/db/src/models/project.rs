//! Rows from `projects`, joined with their `project_members`.

use sqlx::FromRow;
use taskboard_core::project::Project;
use taskboard_core::types::{DbId, Timestamp};

/// Project row with the member set aggregated into an array.
///
/// `member_ids` is produced by an `ARRAY(SELECT ... ORDER BY user_id)`
/// subquery, so it is already sorted and free of duplicates.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub member_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            name: row.name,
            description: row.description,
            member_ids: row.member_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
