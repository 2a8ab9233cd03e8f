//! Project snapshot and DTOs.

use serde::{Deserialize, Serialize};

use crate::task::TaskDetail;
use crate::types::{DbId, Timestamp};
use crate::user::PublicUser;

/// A project together with its member set.
///
/// Both stores hand out `member_ids` sorted and deduplicated, but a snapshot
/// may come from anywhere, so membership never relies on the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub member_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn has_member(&self, user_id: DbId) -> bool {
        self.member_ids.contains(&user_id)
    }
}

/// Request body for `POST /projects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    /// Additional members besides the creator. Unknown ids are dropped.
    #[serde(default)]
    pub team_members: Vec<DbId>,
}

/// Request body for `PUT /projects/{id}`. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Members to add. Existing members are never removed by an update.
    pub team_members: Option<Vec<DbId>>,
}

/// Insert DTO handed to the repository.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub member_ids: Vec<DbId>,
}

/// Project update handed to the repository as one atomic write.
///
/// `None` leaves a field unchanged. Member ids must already be resolved to
/// existing users; they are added, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub add_member_ids: Vec<DbId>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.add_member_ids.is_empty()
    }
}

/// Project read model returned by `GET /projects/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub team_members: Vec<PublicUser>,
    pub tasks: Vec<TaskDetail>,
}

/// Sort and deduplicate a member id list in place.
pub fn normalize_member_ids(ids: &mut Vec<DbId>) {
    ids.sort_unstable();
    ids.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_sorts_and_dedups() {
        let mut ids = vec![3, 1, 3, 2, 1];
        normalize_member_ids(&mut ids);
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn create_project_defaults_members_to_empty() {
        let input: CreateProject = serde_json::from_str(r#"{"name": "P1"}"#).unwrap();
        assert_eq!(input.name, "P1");
        assert!(input.team_members.is_empty());
        assert!(input.description.is_none());
    }
}
