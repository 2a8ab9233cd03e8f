//! Integration tests for `PgStore` against a real database.
//!
//! These need a PostgreSQL server reachable through `DATABASE_URL`; each
//! test gets a fresh database with the migrations applied. Run with
//! `cargo test -p taskboard-db -- --ignored`.

use assert_matches::assert_matches;
use sqlx::PgPool;
use taskboard_core::comment::NewComment;
use taskboard_core::error::CoreError;
use taskboard_core::project::{NewProject, ProjectChanges};
use taskboard_core::store::{IdentityStore, ProjectRepository};
use taskboard_core::task::{InitialComment, NewTask, TaskPriority, TaskStatus, ValidatedTaskPatch};
use taskboard_core::types::DbId;
use taskboard_core::user::{NewUser, User};
use taskboard_db::PgStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn user(store: &PgStore, name: &str) -> User {
    store
        .create_user(NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap()
}

fn new_project(name: &str, member_ids: Vec<DbId>) -> NewProject {
    NewProject {
        name: name.to_string(),
        description: None,
        member_ids,
    }
}

fn new_task(project_id: DbId, title: &str) -> NewTask {
    NewTask {
        project_id,
        title: title.to_string(),
        description: None,
        status: TaskStatus::ToDo,
        priority: TaskPriority::Medium,
        deadline: None,
        assigned_to: None,
        initial_comment: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_users_conflict(pool: PgPool) {
    let store = PgStore::new(pool);
    user(&store, "alice").await;

    let result = store
        .create_user(NewUser {
            username: "alice".into(),
            email: "other@example.com".into(),
            password_hash: "hash".into(),
        })
        .await;
    assert_matches!(result, Err(CoreError::Conflict(msg)) if msg.contains("Username"));

    let result = store
        .create_user(NewUser {
            username: "alice2".into(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
        })
        .await;
    assert_matches!(result, Err(CoreError::Conflict(msg)) if msg.contains("Email"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn project_members_are_sorted_and_filtered(pool: PgPool) {
    let store = PgStore::new(pool);
    let a = user(&store, "a").await;
    let b = user(&store, "b").await;

    let project = store
        .insert_project(new_project("P", vec![b.id, a.id, 9999, b.id]))
        .await
        .unwrap();
    assert_eq!(project.member_ids, vec![a.id, b.id]);

    let listed = store.list_projects_for_member(b.id).await.unwrap();
    assert_eq!(listed.len(), 1);

    let members = store.list_project_members(project.id).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_project_cascades(pool: PgPool) {
    let store = PgStore::new(pool);
    let a = user(&store, "a").await;
    let project = store
        .insert_project(new_project("P", vec![a.id]))
        .await
        .unwrap();
    let task = store.insert_task(new_task(project.id, "T")).await.unwrap();
    let comment = store
        .insert_comment(NewComment {
            task_id: task.id,
            author_id: a.id,
            text: "c".into(),
        })
        .await
        .unwrap();

    assert!(store.delete_project(project.id).await.unwrap());
    assert!(store.find_task(task.id).await.unwrap().is_none());
    assert!(store.find_comment(comment.id).await.unwrap().is_none());
    assert!(!store.delete_project(project.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn task_update_and_missing_parent(pool: PgPool) {
    let store = PgStore::new(pool);
    let a = user(&store, "a").await;
    let project = store
        .insert_project(new_project("P", vec![a.id]))
        .await
        .unwrap();
    let task = store.insert_task(new_task(project.id, "T")).await.unwrap();

    let status_only = ValidatedTaskPatch {
        status: Some(TaskStatus::Done),
        ..Default::default()
    };
    let priority_only = ValidatedTaskPatch {
        priority: Some(TaskPriority::High),
        ..Default::default()
    };
    store.update_task(task.id, &status_only).await.unwrap();
    let updated = store.update_task(task.id, &priority_only).await.unwrap();
    assert_eq!(updated.status, TaskStatus::Done);
    assert_eq!(updated.priority, TaskPriority::High);

    let orphan = store.insert_task(new_task(424_242, "orphan")).await;
    assert_matches!(orphan, Err(CoreError::NotFound { entity: "Project", .. }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn task_with_initial_comment_is_one_write(pool: PgPool) {
    let store = PgStore::new(pool);
    let a = user(&store, "a").await;
    let project = store
        .insert_project(new_project("P", vec![a.id]))
        .await
        .unwrap();

    let mut input = new_task(project.id, "T");
    input.initial_comment = Some(InitialComment {
        author_id: a.id,
        text: "first".into(),
    });
    let task = store.insert_task(input).await.unwrap();
    let comments = store.list_comments_by_task(task.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_id, a.id);

    let mut bad_author = new_task(project.id, "T2");
    bad_author.initial_comment = Some(InitialComment {
        author_id: 424_242,
        text: "ghost".into(),
    });
    assert!(store.insert_task(bad_author).await.is_err());
    let titles: Vec<String> = store
        .list_tasks_by_project(project.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["T".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn project_update_renames_and_adds_members(pool: PgPool) {
    let store = PgStore::new(pool);
    let a = user(&store, "a").await;
    let b = user(&store, "b").await;
    let project = store
        .insert_project(new_project("P", vec![a.id]))
        .await
        .unwrap();

    let changes = ProjectChanges {
        name: Some("Renamed".into()),
        description: None,
        add_member_ids: vec![b.id],
    };
    let updated = store.update_project(project.id, &changes).await.unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.member_ids, vec![a.id, b.id]);

    let missing = store.update_project(424_242, &changes).await;
    assert_matches!(missing, Err(CoreError::NotFound { entity: "Project", .. }));
}
