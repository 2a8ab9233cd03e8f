//! The operations exposed to the request layer.
//!
//! Each operation follows the same shape: resolve the target (NotFound),
//! consult [`access`] (Forbidden), validate input (Validation), then persist
//! through the [`Store`]. The acting user is always identified by id, taken
//! from the authenticated session and never from the payload.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::access;
use crate::comment::{Comment, CommentView, CreateComment, NewComment};
use crate::error::CoreError;
use crate::password::{hash_password, validate_password_strength};
use crate::project::{
    CreateProject, NewProject, Project, ProjectChanges, ProjectDetail, UpdateProject,
};
use crate::store::{IdentityStore, ProjectRepository, Store, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::task::{CreateTask, InitialComment, Task, TaskDetail, TaskPatch};
use crate::types::DbId;
use crate::user::{NewUser, PublicUser, RegisterUser, User};
use crate::validation;

/// Default minimum password length. Any non-empty password is accepted.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 1;

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub min_password_length: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// Project-tracking service over a [`Store`].
///
/// Cheap to clone; the store is shared.
#[derive(Clone)]
pub struct Tracker {
    store: Arc<dyn Store>,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new(store: Arc<dyn Store>, config: TrackerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Create an account. Username and email must both be unused.
    pub async fn register_user(&self, input: &RegisterUser) -> Result<User, CoreError> {
        validation::validate_username(&input.username)?;
        validation::validate_email(&input.email)?;
        validation::validate_required("password", &input.password)?;
        validate_password_strength(&input.password, self.config.min_password_length)?;

        // Checked up front for a precise message; the store enforces the
        // same rule atomically on insert.
        if self
            .store
            .find_user_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(CoreError::Conflict(USERNAME_TAKEN.into()));
        }
        if self.store.find_user_by_email(&input.email).await?.is_some() {
            return Err(CoreError::Conflict(EMAIL_TAKEN.into()));
        }

        let user = self
            .store
            .create_user(NewUser {
                username: input.username.clone(),
                email: input.email.clone(),
                password_hash: hash_password(&input.password)?,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Authenticate by username or email.
    ///
    /// Every failure, including missing fields, is the same
    /// [`CoreError::InvalidCredentials`].
    pub async fn login(&self, identifier: &str, password: &str) -> Result<User, CoreError> {
        if identifier.is_empty() || password.is_empty() {
            return Err(CoreError::InvalidCredentials);
        }
        match self.store.verify_credentials(identifier, password).await? {
            Some(user) => {
                tracing::info!(user_id = user.id, "User logged in");
                Ok(user)
            }
            None => {
                tracing::warn!("Failed login attempt");
                Err(CoreError::InvalidCredentials)
            }
        }
    }

    /// Resolve a user id from a session, failing if the account is gone.
    pub async fn session_user(&self, user_id: DbId) -> Result<User, CoreError> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("User no longer exists".into()))
    }

    pub async fn list_users(&self) -> Result<Vec<PublicUser>, CoreError> {
        let users = self.store.list_users().await?;
        Ok(users.iter().map(User::to_public).collect())
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub async fn list_projects_for_user(&self, user_id: DbId) -> Result<Vec<Project>, CoreError> {
        self.store.list_projects_for_member(user_id).await
    }

    /// Create a project. The creator is always a member; extra member ids
    /// that do not resolve to a user are dropped.
    pub async fn create_project(
        &self,
        creator_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, CoreError> {
        validation::validate_name(&input.name)?;
        let creator = self.session_user(creator_id).await?;

        let mut member_ids = vec![creator.id];
        member_ids.extend(self.resolve_member_ids(&input.team_members).await?);

        let project = self
            .store
            .insert_project(NewProject {
                name: input.name.trim().to_string(),
                description: input.description.clone(),
                member_ids,
            })
            .await?;

        tracing::info!(
            project_id = project.id,
            creator_id,
            member_count = project.member_ids.len(),
            "Project created",
        );
        Ok(project)
    }

    pub async fn get_project(&self, user_id: DbId, project_id: DbId) -> Result<Project, CoreError> {
        let project = self.load_project(project_id).await?;
        self.check(access::ensure_project_access(user_id, &project), user_id, "project", project_id)?;
        Ok(project)
    }

    /// Project with members, tasks, and each task's comments.
    pub async fn project_detail(
        &self,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<ProjectDetail, CoreError> {
        let project = self.get_project(user_id, project_id).await?;
        let team_members = self.store.list_project_members(project.id).await?;
        let tasks = self.store.list_tasks_by_project(project.id).await?;

        Ok(ProjectDetail {
            project,
            team_members: team_members.iter().map(User::to_public).collect(),
            tasks: self.task_details(tasks).await?,
        })
    }

    /// Partially update name, description, and add members.
    pub async fn update_project(
        &self,
        user_id: DbId,
        project_id: DbId,
        input: &UpdateProject,
    ) -> Result<Project, CoreError> {
        let project = self.load_project(project_id).await?;
        self.check(access::ensure_project_modify(user_id, &project), user_id, "project", project_id)?;

        if let Some(name) = &input.name {
            validation::validate_name(name)?;
        }
        let add_member_ids = match &input.team_members {
            Some(ids) => self.resolve_member_ids(ids).await?,
            None => Vec::new(),
        };

        let changes = ProjectChanges {
            name: input.name.as_ref().map(|name| name.trim().to_string()),
            description: input.description.clone(),
            add_member_ids,
        };
        if changes.is_empty() {
            return Ok(project);
        }
        let project = self.store.update_project(project.id, &changes).await?;

        tracing::info!(project_id, user_id, "Project updated");
        Ok(project)
    }

    /// Delete a project, cascading to its tasks and their comments.
    pub async fn delete_project(&self, user_id: DbId, project_id: DbId) -> Result<(), CoreError> {
        let project = self.load_project(project_id).await?;
        self.check(access::ensure_project_modify(user_id, &project), user_id, "project", project_id)?;

        if !self.store.delete_project(project.id).await? {
            return Err(CoreError::not_found("Project", project_id));
        }
        tracing::info!(project_id, user_id, "Project deleted");
        Ok(())
    }

    /// Members of a project. Requires authentication only, not membership.
    pub async fn list_assigned_users(&self, project_id: DbId) -> Result<Vec<PublicUser>, CoreError> {
        let project = self.load_project(project_id).await?;
        let members = self.store.list_project_members(project.id).await?;
        Ok(members.iter().map(User::to_public).collect())
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Tasks of a project, each with its assignee and comments resolved.
    pub async fn list_tasks(
        &self,
        user_id: DbId,
        project_id: DbId,
    ) -> Result<Vec<TaskDetail>, CoreError> {
        let project = self.get_project(user_id, project_id).await?;
        let tasks = self.store.list_tasks_by_project(project.id).await?;
        self.task_details(tasks).await
    }

    /// Create a task in a project the caller belongs to, plus an optional
    /// first comment authored by the caller.
    pub async fn create_task(
        &self,
        user_id: DbId,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, CoreError> {
        let project = self.get_project(user_id, project_id).await?;
        let mut new_task = input.to_new_task(project.id)?;

        if let Some(assignee) = new_task.assigned_to {
            if self.store.find_user_by_id(assignee).await?.is_none() {
                return Err(CoreError::Validation(format!(
                    "Invalid assigned_to value: user {assignee} does not exist"
                )));
            }
        }
        if let Some(text) = input.comment.as_deref().filter(|t| !t.trim().is_empty()) {
            validation::validate_comment_text(text)?;
            new_task.initial_comment = Some(InitialComment {
                author_id: user_id,
                text: text.to_string(),
            });
        }

        let with_comment = new_task.initial_comment.is_some();
        let task = self.store.insert_task(new_task).await?;
        tracing::info!(task_id = task.id, project_id, user_id, with_comment, "Task created");
        Ok(task)
    }

    pub async fn get_task(&self, user_id: DbId, task_id: DbId) -> Result<Task, CoreError> {
        let (task, _project) = self.load_task_scope(user_id, task_id).await?;
        Ok(task)
    }

    pub async fn task_detail(&self, user_id: DbId, task_id: DbId) -> Result<TaskDetail, CoreError> {
        let task = self.get_task(user_id, task_id).await?;
        self.build_task_detail(task).await
    }

    /// Apply a partial status/priority/deadline update.
    ///
    /// Nothing is persisted unless every present field is valid.
    pub async fn update_task_status(
        &self,
        user_id: DbId,
        task_id: DbId,
        patch: &TaskPatch,
    ) -> Result<Task, CoreError> {
        let (task, _project) = self.load_task_scope(user_id, task_id).await?;
        let validated = patch.validate()?;
        if validated.is_empty() {
            tracing::debug!(task_id, "Empty task patch, nothing to persist");
            return Ok(task);
        }

        let updated = self.store.update_task(task.id, &validated).await?;
        tracing::info!(
            task_id,
            user_id,
            status = %updated.status,
            priority = %updated.priority,
            "Task updated",
        );
        Ok(updated)
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    pub async fn list_comments(
        &self,
        user_id: DbId,
        task_id: DbId,
    ) -> Result<Vec<CommentView>, CoreError> {
        let (task, _project) = self.load_task_scope(user_id, task_id).await?;
        let comments = self.store.list_comments_by_task(task.id).await?;
        self.comment_views(comments).await
    }

    /// Add a comment authored by the caller.
    pub async fn create_comment(
        &self,
        user_id: DbId,
        task_id: DbId,
        input: &CreateComment,
    ) -> Result<CommentView, CoreError> {
        let (task, _project) = self.load_task_scope(user_id, task_id).await?;
        validation::validate_comment_text(&input.text)?;
        let author = self.session_user(user_id).await?;

        let comment = self
            .store
            .insert_comment(NewComment {
                task_id: task.id,
                author_id: author.id,
                text: input.text.clone(),
            })
            .await?;

        tracing::info!(comment_id = comment.id, task_id, user_id, "Comment created");
        Ok(CommentView::new(comment, author.username))
    }

    pub async fn get_comment(&self, user_id: DbId, comment_id: DbId) -> Result<CommentView, CoreError> {
        let comment = self
            .store
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;
        let task = self
            .store
            .find_task(comment.task_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Task", comment.task_id))?;
        let project = self.load_project(task.project_id).await?;
        self.check(
            access::ensure_comment_access(user_id, &comment, &task, &project),
            user_id,
            "comment",
            comment_id,
        )?;

        let mut views = self.comment_views(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| CoreError::Internal("Comment view missing".into()))
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn load_project(&self, project_id: DbId) -> Result<Project, CoreError> {
        self.store
            .find_project(project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id))
    }

    /// Load a task and its owning project, then require membership.
    async fn load_task_scope(
        &self,
        user_id: DbId,
        task_id: DbId,
    ) -> Result<(Task, Project), CoreError> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        let project = self.load_project(task.project_id).await?;
        self.check(access::ensure_task_access(user_id, &task, &project), user_id, "task", task_id)?;
        Ok((task, project))
    }

    /// Log policy denials before handing them back.
    fn check(
        &self,
        decision: Result<(), CoreError>,
        user_id: DbId,
        entity: &'static str,
        entity_id: DbId,
    ) -> Result<(), CoreError> {
        if decision.is_err() {
            tracing::warn!(user_id, entity, entity_id, "Access denied");
        }
        decision
    }

    /// Keep only ids that resolve to an existing user.
    async fn resolve_member_ids(&self, ids: &[DbId]) -> Result<Vec<DbId>, CoreError> {
        let mut resolved = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.store.find_user_by_id(id).await? {
                Some(user) => resolved.push(user.id),
                None => tracing::warn!(user_id = id, "Ignoring unknown team member id"),
            }
        }
        Ok(resolved)
    }

    async fn task_details(&self, tasks: Vec<Task>) -> Result<Vec<TaskDetail>, CoreError> {
        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            details.push(self.build_task_detail(task).await?);
        }
        Ok(details)
    }

    async fn build_task_detail(&self, task: Task) -> Result<TaskDetail, CoreError> {
        let assignee = match task.assigned_to {
            Some(id) => self
                .store
                .find_user_by_id(id)
                .await?
                .map(|u| u.to_public()),
            None => None,
        };
        let comments = self.store.list_comments_by_task(task.id).await?;
        let comments = self.comment_views(comments).await?;
        Ok(TaskDetail {
            task,
            assignee,
            comments,
        })
    }

    /// Resolve author usernames, fetching each author once.
    async fn comment_views(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>, CoreError> {
        let mut authors: BTreeMap<DbId, String> = BTreeMap::new();
        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let username = match authors.get(&comment.author_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .store
                        .find_user_by_id(comment.author_id)
                        .await?
                        .map(|u| u.username)
                        .unwrap_or_default();
                    authors.insert(comment.author_id, name.clone());
                    name
                }
            };
            views.push(CommentView::new(comment, username));
        }
        Ok(views)
    }
}
