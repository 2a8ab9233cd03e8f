//! In-process [`Store`](super::Store) backed by ordered maps.
//!
//! Entities are addressed by id, one counter per table, mirroring the
//! BIGSERIAL keys of the PostgreSQL schema. A single `RwLock` guards all
//! tables, and every trait method takes it exactly once, so each write is
//! atomic with respect to other callers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{IdentityStore, ProjectRepository, EMAIL_TAKEN, USERNAME_TAKEN};
use crate::comment::{Comment, NewComment};
use crate::error::CoreError;
use crate::project::{normalize_member_ids, NewProject, Project, ProjectChanges};
use crate::task::{NewTask, Task, ValidatedTaskPatch};
use crate::types::DbId;
use crate::user::{NewUser, User};

#[derive(Default)]
struct Tables {
    last_user_id: DbId,
    last_project_id: DbId,
    last_task_id: DbId,
    last_comment_id: DbId,
    users: BTreeMap<DbId, User>,
    projects: BTreeMap<DbId, Project>,
    tasks: BTreeMap<DbId, Task>,
    comments: BTreeMap<DbId, Comment>,
}

fn next_id(counter: &mut DbId) -> DbId {
    *counter += 1;
    *counter
}

/// Volatile store used by tests and by the server when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, CoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn create_user(&self, input: NewUser) -> Result<User, CoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(CoreError::Conflict(USERNAME_TAKEN.into()));
        }
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(CoreError::Conflict(EMAIL_TAKEN.into()));
        }

        let id = next_id(&mut tables.last_user_id);
        let user = User {
            id,
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, CoreError> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects_for_member(&self, user_id: DbId) -> Result<Vec<Project>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .values()
            .rev()
            .filter(|p| p.has_member(user_id))
            .cloned()
            .collect())
    }

    async fn insert_project(&self, input: NewProject) -> Result<Project, CoreError> {
        let mut tables = self.tables.write().await;
        let mut member_ids: Vec<DbId> = input
            .member_ids
            .into_iter()
            .filter(|id| tables.users.contains_key(id))
            .collect();
        normalize_member_ids(&mut member_ids);

        let id = next_id(&mut tables.last_project_id);
        let now = Utc::now();
        let project = Project {
            id,
            name: input.name,
            description: input.description,
            member_ids,
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        project_id: DbId,
        changes: &ProjectChanges,
    ) -> Result<Project, CoreError> {
        let mut tables = self.tables.write().await;
        let known: Vec<DbId> = changes
            .add_member_ids
            .iter()
            .copied()
            .filter(|id| tables.users.contains_key(id))
            .collect();
        let stored = tables
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;
        if let Some(name) = &changes.name {
            stored.name = name.clone();
        }
        if let Some(description) = &changes.description {
            stored.description = Some(description.clone());
        }
        stored.member_ids.extend(known);
        normalize_member_ids(&mut stored.member_ids);
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_project(&self, id: DbId) -> Result<bool, CoreError> {
        let mut tables = self.tables.write().await;
        if tables.projects.remove(&id).is_none() {
            return Ok(false);
        }
        let task_ids: Vec<DbId> = tables
            .tasks
            .values()
            .filter(|t| t.project_id == id)
            .map(|t| t.id)
            .collect();
        tables.tasks.retain(|_, t| t.project_id != id);
        tables.comments.retain(|_, c| !task_ids.contains(&c.task_id));
        Ok(true)
    }

    async fn list_project_members(&self, project_id: DbId) -> Result<Vec<User>, CoreError> {
        let tables = self.tables.read().await;
        let project = tables
            .projects
            .get(&project_id)
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;
        Ok(project
            .member_ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn find_task(&self, id: DbId) -> Result<Option<Task>, CoreError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks_by_project(&self, project_id: DbId) -> Result<Vec<Task>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn insert_task(&self, input: NewTask) -> Result<Task, CoreError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.contains_key(&input.project_id) {
            return Err(CoreError::not_found("Project", input.project_id));
        }
        let id = next_id(&mut tables.last_task_id);
        let now = Utc::now();
        let task = Task {
            id,
            project_id: input.project_id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            deadline: input.deadline,
            assigned_to: input.assigned_to,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(id, task.clone());

        if let Some(first) = input.initial_comment {
            let comment_id = next_id(&mut tables.last_comment_id);
            tables.comments.insert(
                comment_id,
                Comment {
                    id: comment_id,
                    task_id: id,
                    author_id: first.author_id,
                    text: first.text,
                    created_at: now,
                },
            );
        }
        Ok(task)
    }

    async fn update_task(
        &self,
        task_id: DbId,
        patch: &ValidatedTaskPatch,
    ) -> Result<Task, CoreError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| CoreError::not_found("Task", task_id))?;
        patch.apply(stored);
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn find_comment(&self, id: DbId) -> Result<Option<Comment>, CoreError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_comments_by_task(&self, task_id: DbId) -> Result<Vec<Comment>, CoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, input: NewComment) -> Result<Comment, CoreError> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&input.task_id) {
            return Err(CoreError::not_found("Task", input.task_id));
        }
        let id = next_id(&mut tables.last_comment_id);
        let comment = Comment {
            id,
            task_id: input.task_id,
            author_id: input.author_id,
            text: input.text,
            created_at: Utc::now(),
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }
}
