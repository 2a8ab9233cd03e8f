//! Collaborator traits the [`Tracker`](crate::tracker::Tracker) depends on.
//!
//! - [`IdentityStore`] -- user accounts and credential checks.
//! - [`ProjectRepository`] -- projects, memberships, tasks and comments.
//! - [`Store`] -- both at once; what the tracker actually holds.
//!
//! Implementations: [`memory::MemoryStore`] here and `PgStore` in
//! `taskboard-db`. Each method is a single atomic step against the backing
//! storage; the tracker never holds anything across calls.

pub mod memory;

use async_trait::async_trait;

use crate::comment::{Comment, NewComment};
use crate::error::CoreError;
use crate::password::verify_password;
use crate::project::{NewProject, Project, ProjectChanges};
use crate::task::{NewTask, Task, ValidatedTaskPatch};
use crate::types::DbId;
use crate::user::{NewUser, User};

/// Conflict message when a username is taken.
pub const USERNAME_TAKEN: &str = "Username already exists";

/// Conflict message when an email is taken.
pub const EMAIL_TAKEN: &str = "Email already registered";

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, CoreError>;

    /// Exact, case-sensitive match.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError>;

    /// Exact, case-sensitive match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    /// All users ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, CoreError>;

    /// Insert a user. Fails with [`CoreError::Conflict`] carrying
    /// [`USERNAME_TAKEN`] or [`EMAIL_TAKEN`] when either is already in use.
    async fn create_user(&self, input: NewUser) -> Result<User, CoreError>;

    /// Resolve a username-or-email plus password to a user.
    ///
    /// The identifier is tried as a username first and then as an email,
    /// so a username that happens to look like someone else's email still
    /// authenticates its own account.
    async fn verify_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<User>, CoreError> {
        if let Some(user) = self.find_user_by_username(identifier).await? {
            if verify_password(password, &user.password_hash)? {
                return Ok(Some(user));
            }
        }
        if let Some(user) = self.find_user_by_email(identifier).await? {
            if verify_password(password, &user.password_hash)? {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Cheap reachability check for `/health`.
    async fn ping(&self) -> Result<(), CoreError>;

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, CoreError>;

    /// Projects the user is a member of, newest first.
    async fn list_projects_for_member(&self, user_id: DbId) -> Result<Vec<Project>, CoreError>;

    /// Insert a project together with its initial member set.
    async fn insert_project(&self, input: NewProject) -> Result<Project, CoreError>;

    /// Apply name, description and member additions in one atomic write.
    /// Existing members are kept.
    async fn update_project(
        &self,
        project_id: DbId,
        changes: &ProjectChanges,
    ) -> Result<Project, CoreError>;

    /// Delete a project and, transitively, its tasks and their comments.
    /// Returns `false` if no such project existed.
    async fn delete_project(&self, id: DbId) -> Result<bool, CoreError>;

    /// Member accounts ordered by id.
    async fn list_project_members(&self, project_id: DbId) -> Result<Vec<User>, CoreError>;

    async fn find_task(&self, id: DbId) -> Result<Option<Task>, CoreError>;

    /// Tasks of a project ordered by id.
    async fn list_tasks_by_project(&self, project_id: DbId) -> Result<Vec<Task>, CoreError>;

    /// Insert a task and, if present, its initial comment atomically.
    async fn insert_task(&self, input: NewTask) -> Result<Task, CoreError>;

    /// Write only the fields present in `patch` against the current row, so
    /// concurrent patches of different fields do not undo each other.
    /// Bumps `updated_at`.
    async fn update_task(
        &self,
        task_id: DbId,
        patch: &ValidatedTaskPatch,
    ) -> Result<Task, CoreError>;

    async fn find_comment(&self, id: DbId) -> Result<Option<Comment>, CoreError>;

    /// Comments of a task, oldest first.
    async fn list_comments_by_task(&self, task_id: DbId) -> Result<Vec<Comment>, CoreError>;

    async fn insert_comment(&self, input: NewComment) -> Result<Comment, CoreError>;
}

/// Both collaborators behind one object.
pub trait Store: IdentityStore + ProjectRepository {}

impl<T: IdentityStore + ProjectRepository> Store for T {}
