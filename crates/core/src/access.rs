//! Membership-based authorization policy.
//!
//! Membership of a project is the only capability in the system: a member may
//! read, modify and delete the project and everything under it. Task and
//! comment access is derived from the owning project; there is no entity-local
//! ACL.
//!
//! Every check takes the parent snapshots explicitly and refuses when they do
//! not belong together, so a caller cannot authorize a task against some
//! other project the user happens to be a member of.
//!
//! Callers resolve the entities first. A missing entity is
//! [`CoreError::NotFound`]; a denial from this module is
//! [`CoreError::Forbidden`]. The two are never folded together.

use crate::comment::Comment;
use crate::error::CoreError;
use crate::project::Project;
use crate::task::Task;
use crate::types::DbId;

pub fn can_access_project(user_id: DbId, project: &Project) -> bool {
    project.has_member(user_id)
}

/// Same rule as [`can_access_project`]; there is no owner or admin role.
pub fn can_modify_project(user_id: DbId, project: &Project) -> bool {
    can_access_project(user_id, project)
}

/// `project` must be the task's owning project.
pub fn can_access_task(user_id: DbId, task: &Task, project: &Project) -> bool {
    task.project_id == project.id && can_access_project(user_id, project)
}

/// `task` must own the comment and `project` must own the task.
pub fn can_access_comment(user_id: DbId, comment: &Comment, task: &Task, project: &Project) -> bool {
    comment.task_id == task.id && can_access_task(user_id, task, project)
}

pub fn ensure_project_access(user_id: DbId, project: &Project) -> Result<(), CoreError> {
    if can_access_project(user_id, project) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

pub fn ensure_project_modify(user_id: DbId, project: &Project) -> Result<(), CoreError> {
    if can_modify_project(user_id, project) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

pub fn ensure_task_access(user_id: DbId, task: &Task, project: &Project) -> Result<(), CoreError> {
    if can_access_task(user_id, task, project) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

pub fn ensure_comment_access(
    user_id: DbId,
    comment: &Comment,
    task: &Task,
    project: &Project,
) -> Result<(), CoreError> {
    if can_access_comment(user_id, comment, task, project) {
        Ok(())
    } else {
        Err(forbidden())
    }
}

// The message stays generic so a denial never leaks entity contents.
fn forbidden() -> CoreError {
    CoreError::Forbidden("You are not a member of this project".into())
}
