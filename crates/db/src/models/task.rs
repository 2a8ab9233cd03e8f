//! Rows from the `tasks` table.

use sqlx::FromRow;
use taskboard_core::error::CoreError;
use taskboard_core::task::{Task, TaskPriority, TaskStatus};
use taskboard_core::types::{DbId, Timestamp};

/// Task row with `status` and `priority` as their stored text values.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub deadline: Option<Timestamp>,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    /// The CHECK constraints make a parse failure a schema bug, so it is
    /// reported as internal rather than as a validation error.
    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::parse(&row.status).map_err(|_| {
            CoreError::Internal(format!("Task {} has unknown status '{}'", row.id, row.status))
        })?;
        let priority = TaskPriority::parse(&row.priority).map_err(|_| {
            CoreError::Internal(format!(
                "Task {} has unknown priority '{}'",
                row.id, row.priority
            ))
        })?;
        Ok(Task {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            status,
            priority,
            deadline: row.deadline,
            assigned_to: row.assigned_to,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn row(status: &str, priority: &str) -> TaskRow {
        TaskRow {
            id: 7,
            project_id: 1,
            title: "T".into(),
            description: None,
            status: status.into(),
            priority: priority.into(),
            deadline: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn stored_values_convert() {
        let task = Task::try_from(row("in_progress", "high")).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn unknown_stored_value_is_internal() {
        let err = Task::try_from(row("archived", "low")).unwrap_err();
        assert!(matches!(err, CoreError::Internal(msg) if msg.contains("archived")));
    }
}
