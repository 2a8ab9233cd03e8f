//! Task snapshot, status/priority enums, and the task mutation policy.
//!
//! Status, priority and deadline arrive as raw strings so an unknown value
//! can be reported by name instead of as an opaque body rejection.
//! [`TaskPatch::validate`] turns the raw record into a [`ValidatedTaskPatch`];
//! only that type can be applied to a task, so nothing is persisted until
//! every present field has been checked.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::comment::CommentView;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::user::PublicUser;

/* --------------------------------------------------------------------------
Status and priority
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to_do",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parse a wire value, naming the bad value in the error.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| invalid_choice("status", value, &Self::ALL.map(Self::as_str)))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == value)
            .ok_or_else(|| invalid_choice("priority", value, &Self::ALL.map(Self::as_str)))
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn invalid_choice(field: &str, value: &str, allowed: &[&str]) -> CoreError {
    CoreError::Validation(format!(
        "Invalid {field} value '{value}'. Must be one of: {}",
        allowed.join(", ")
    ))
}

/// Parse a deadline. Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`
/// (taken as UTC), or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_deadline(value: &str) -> Result<Timestamp, CoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Some(naive) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(CoreError::Validation(format!(
        "Invalid deadline value '{value}'. Expected an RFC 3339 timestamp or YYYY-MM-DD"
    )))
}

/// Empty strings count as "not supplied", like a missing key.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/* --------------------------------------------------------------------------
Entities and DTOs
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: Option<Timestamp>,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /projects/{id}/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTask {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
    pub assigned_to: Option<DbId>,
    /// Optional first comment, authored by the creator.
    pub comment: Option<String>,
}

/// Insert DTO handed to the repository.
///
/// The task and its optional first comment are stored together or not at all.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: Option<Timestamp>,
    pub assigned_to: Option<DbId>,
    pub initial_comment: Option<InitialComment>,
}

/// First comment written alongside a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialComment {
    pub author_id: DbId,
    pub text: String,
}

impl CreateTask {
    /// Validate the task fields and build the insert DTO for `project_id`.
    ///
    /// Does not check `assigned_to` against the identity store, and leaves
    /// `initial_comment` for the caller, who knows the author.
    pub fn to_new_task(&self, project_id: DbId) -> Result<NewTask, CoreError> {
        crate::validation::validate_title(&self.title)?;
        let status = present(&self.status)
            .map(TaskStatus::parse)
            .transpose()?
            .unwrap_or_default();
        let priority = present(&self.priority)
            .map(TaskPriority::parse)
            .transpose()?
            .unwrap_or_default();
        let deadline = present(&self.deadline).map(parse_deadline).transpose()?;

        Ok(NewTask {
            project_id,
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            status,
            priority,
            deadline,
            assigned_to: self.assigned_to,
            initial_comment: None,
        })
    }
}

/// Task read model with the assignee and comments resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub assignee: Option<PublicUser>,
    pub comments: Vec<CommentView>,
}

/* --------------------------------------------------------------------------
Mutation policy
-------------------------------------------------------------------------- */

/// Raw partial update for `PATCH /tasks/{id}/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
}

/// A partial update whose every present field has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidatedTaskPatch {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<Timestamp>,
}

impl TaskPatch {
    /// Check status, then priority, then deadline.
    ///
    /// The first invalid field rejects the whole patch, so a bad status
    /// also blocks an accompanying valid priority.
    pub fn validate(&self) -> Result<ValidatedTaskPatch, CoreError> {
        Ok(ValidatedTaskPatch {
            status: present(&self.status).map(TaskStatus::parse).transpose()?,
            priority: present(&self.priority)
                .map(TaskPriority::parse)
                .transpose()?,
            deadline: present(&self.deadline).map(parse_deadline).transpose()?,
        })
    }
}

impl ValidatedTaskPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.deadline.is_none()
    }

    /// Replace the present fields of `task` in place; absent ones are kept.
    pub fn apply(&self, task: &mut Task) {
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = Some(deadline);
        }
    }
}
