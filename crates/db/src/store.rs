//! [`PgStore`]: the core store traits over PostgreSQL.
//!
//! Uniqueness and cascade rules are enforced by the schema; this adapter
//! only translates `sqlx` failures into [`CoreError`]s.

use async_trait::async_trait;
use taskboard_core::comment::{Comment, NewComment};
use taskboard_core::error::CoreError;
use taskboard_core::project::{NewProject, Project, ProjectChanges};
use taskboard_core::store::{IdentityStore, ProjectRepository, EMAIL_TAKEN, USERNAME_TAKEN};
use taskboard_core::task::{NewTask, Task, ValidatedTaskPatch};
use taskboard_core::types::DbId;
use taskboard_core::user::{NewUser, User};

use crate::repositories::{CommentRepo, ProjectRepo, TaskRepo, UserRepo};
use crate::{health_check, DbPool};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a database failure to a domain error.
///
/// Unique violations on the user constraints become conflicts with the same
/// messages the in-memory store uses. Everything else is logged and hidden
/// behind a generic internal error.
fn db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            match db_err.constraint() {
                Some("uq_users_username") => return CoreError::Conflict(USERNAME_TAKEN.into()),
                Some("uq_users_email") => return CoreError::Conflict(EMAIL_TAKEN.into()),
                _ => {}
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal("A database error occurred".into())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err)
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_id(&self.pool, id).await.map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let row = UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        let rows = UserRepo::list(&self.pool).await.map_err(db_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, input: NewUser) -> Result<User, CoreError> {
        let row = UserRepo::create(&self.pool, &input)
            .await
            .map_err(db_error)?;
        Ok(row.into())
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn ping(&self) -> Result<(), CoreError> {
        health_check(&self.pool).await.map_err(db_error)
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, CoreError> {
        let row = ProjectRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?;
        Ok(row.map(Project::from))
    }

    async fn list_projects_for_member(&self, user_id: DbId) -> Result<Vec<Project>, CoreError> {
        let rows = ProjectRepo::list_for_member(&self.pool, user_id)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn insert_project(&self, input: NewProject) -> Result<Project, CoreError> {
        let row = ProjectRepo::create(&self.pool, &input)
            .await
            .map_err(db_error)?;
        Ok(row.into())
    }

    async fn update_project(
        &self,
        project_id: DbId,
        changes: &ProjectChanges,
    ) -> Result<Project, CoreError> {
        ProjectRepo::update(&self.pool, project_id, changes)
            .await
            .map_err(db_error)?
            .map(Project::from)
            .ok_or_else(|| CoreError::not_found("Project", project_id))
    }

    async fn delete_project(&self, id: DbId) -> Result<bool, CoreError> {
        ProjectRepo::delete(&self.pool, id).await.map_err(db_error)
    }

    async fn list_project_members(&self, project_id: DbId) -> Result<Vec<User>, CoreError> {
        if self.find_project(project_id).await?.is_none() {
            return Err(CoreError::not_found("Project", project_id));
        }
        let rows = ProjectRepo::list_members(&self.pool, project_id)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_task(&self, id: DbId) -> Result<Option<Task>, CoreError> {
        TaskRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?
            .map(Task::try_from)
            .transpose()
    }

    async fn list_tasks_by_project(&self, project_id: DbId) -> Result<Vec<Task>, CoreError> {
        TaskRepo::list_by_project(&self.pool, project_id)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }

    async fn insert_task(&self, input: NewTask) -> Result<Task, CoreError> {
        match TaskRepo::create(&self.pool, &input).await {
            Ok(row) => row.try_into(),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(CoreError::not_found("Project", input.project_id))
            }
            Err(e) => Err(db_error(e)),
        }
    }

    async fn update_task(
        &self,
        task_id: DbId,
        patch: &ValidatedTaskPatch,
    ) -> Result<Task, CoreError> {
        TaskRepo::update(&self.pool, task_id, patch)
            .await
            .map_err(db_error)?
            .ok_or_else(|| CoreError::not_found("Task", task_id))?
            .try_into()
    }

    async fn find_comment(&self, id: DbId) -> Result<Option<Comment>, CoreError> {
        let row = CommentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_error)?;
        Ok(row.map(Comment::from))
    }

    async fn list_comments_by_task(&self, task_id: DbId) -> Result<Vec<Comment>, CoreError> {
        let rows = CommentRepo::list_by_task(&self.pool, task_id)
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn insert_comment(&self, input: NewComment) -> Result<Comment, CoreError> {
        match CommentRepo::create(&self.pool, &input).await {
            Ok(row) => Ok(row.into()),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(CoreError::not_found("Task", input.task_id))
            }
            Err(e) => Err(db_error(e)),
        }
    }
}
