//! Repository for the `projects` and `project_members` tables.

use sqlx::{PgConnection, PgPool};
use taskboard_core::project::{NewProject, ProjectChanges};
use taskboard_core::types::DbId;

use crate::models::project::ProjectRow;
use crate::models::user::UserRow;

/// Column list shared across queries. Expects `projects` aliased as `p`.
const COLUMNS: &str = "p.id, p.name, p.description, \
     ARRAY(SELECT m.user_id FROM project_members m \
           WHERE m.project_id = p.id ORDER BY m.user_id) AS member_ids, \
     p.created_at, p.updated_at";

/// Provides CRUD operations for projects and their membership.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project and its members in one transaction.
    ///
    /// Member ids with no matching user are skipped; duplicates collapse.
    pub async fn create(pool: &PgPool, input: &NewProject) -> Result<ProjectRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO projects (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_members(&mut *tx, id, &input.member_ids).await?;
        let row = Self::fetch(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects p WHERE p.id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects the user belongs to, most recently created first.
    pub async fn list_for_member(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE EXISTS (
                 SELECT 1 FROM project_members m
                 WHERE m.project_id = p.id AND m.user_id = $1
             )
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply name, description and member additions in one transaction.
    ///
    /// Absent fields keep their stored value; the row is locked first so a
    /// concurrent update cannot interleave. Returns `None` if the project
    /// does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &ProjectChanges,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Ok(None);
        }

        if changes.name.is_some() || changes.description.is_some() {
            sqlx::query(
                "UPDATE projects SET
                    name = COALESCE($2, name),
                    description = COALESCE($3, description)
                 WHERE id = $1",
            )
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.description)
            .execute(&mut *tx)
            .await?;
        }
        Self::insert_members(&mut *tx, id, &changes.add_member_ids).await?;
        let row = Self::fetch(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    /// Delete a project. Tasks, comments and memberships go with it via
    /// `ON DELETE CASCADE`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Member accounts of a project ordered by user ID.
    pub async fn list_members(pool: &PgPool, id: DbId) -> Result<Vec<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            "SELECT u.id, u.username, u.email, u.password_hash, u.created_at
             FROM users u
             JOIN project_members m ON m.user_id = u.id
             WHERE m.project_id = $1
             ORDER BY u.id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }

    async fn insert_members(
        conn: &mut PgConnection,
        project_id: DbId,
        user_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO project_members (project_id, user_id)
             SELECT $1, u.id FROM users u WHERE u.id = ANY($2)
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(user_ids)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn fetch(conn: &mut PgConnection, id: DbId) -> Result<ProjectRow, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects p WHERE p.id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }
}
