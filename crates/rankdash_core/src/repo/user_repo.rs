//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read and update user rows provisioned by the auth collaborator.
//! - Gather the raw inputs of user-wide statistics.
//!
//! # Invariants
//! - Statistics only cover projects owned by the given user.
//! - `plan_type` is persisted using its wire label.

use super::rows::{
    count_to_u64, load_keywords, load_owned_projects, parse_user_row, USER_COLUMNS,
};
use super::{RepoError, RepoResult};
use crate::db::ensure_schema_ready;
use crate::model::project::ProjectId;
use crate::model::tracking::Keyword;
use crate::model::user::{User, UserId, UserPatch};
use crate::model::views::{ProfileProject, UserCounts, UserProfile};
use rusqlite::{params, Connection};
use std::collections::HashMap;

/// Repository interface for user data access.
pub trait UserRepository {
    /// Inserts a user row; used by session provisioning and seeding.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// User with owned projects (newest first), their keywords and counts.
    fn get_profile(&self, id: UserId) -> RepoResult<Option<UserProfile>>;
    /// Applies `patch` and returns the stored user.
    fn update_user(&self, id: UserId, patch: &UserPatch, now: i64) -> RepoResult<User>;
    /// Project, keyword and ranking totals across owned projects.
    fn count_owned(&self, id: UserId) -> RepoResult<UserCounts>;
    /// Positions of every owned ranking dated at or after `since`.
    fn ranking_positions_since(&self, id: UserId, since: i64) -> RepoResult<Vec<u32>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (
                id,
                name,
                email,
                plan_type,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                user.id.to_string(),
                user.name.as_deref(),
                user.email.as_deref(),
                user.plan_type.as_str(),
                user.created_at,
                user.updated_at,
            ],
        )?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, plan_type, created_at, updated_at
             FROM users
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_profile(&self, id: UserId) -> RepoResult<Option<UserProfile>> {
        let Some(user) = self.get_user(id)? else {
            return Ok(None);
        };

        let mut by_project: HashMap<ProjectId, Vec<Keyword>> = HashMap::new();
        for keyword in load_keywords(self.conn, id, None)? {
            by_project.entry(keyword.project_id).or_default().push(keyword);
        }

        let projects = load_owned_projects(self.conn, id)?
            .into_iter()
            .map(|(project, counts)| ProfileProject {
                keywords: by_project.remove(&project.id).unwrap_or_default(),
                project,
                counts,
            })
            .collect();

        Ok(Some(UserProfile { user, projects }))
    }

    fn update_user(&self, id: UserId, patch: &UserPatch, now: i64) -> RepoResult<User> {
        let changed = self.conn.execute(
            "UPDATE users
             SET
                name = COALESCE(?2, name),
                plan_type = COALESCE(?3, plan_type),
                updated_at = ?4
             WHERE id = ?1;",
            params![
                id.to_string(),
                patch.name.as_deref(),
                patch.plan_type.map(|plan| plan.as_str()),
                now,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.get_user(id)?.ok_or(RepoError::NotFound(id))
    }

    fn count_owned(&self, id: UserId) -> RepoResult<UserCounts> {
        let (projects, keywords, rankings): (i64, i64, i64) = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM projects p WHERE p.user_id = ?1),
                (SELECT COUNT(*)
                 FROM keywords k
                 JOIN projects p ON p.id = k.project_id
                 WHERE p.user_id = ?1),
                (SELECT COUNT(*)
                 FROM rankings r
                 JOIN keywords k ON k.id = r.keyword_id
                 JOIN projects p ON p.id = k.project_id
                 WHERE p.user_id = ?1);",
            [id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(UserCounts {
            project_count: count_to_u64(projects),
            keyword_count: count_to_u64(keywords),
            total_rankings: count_to_u64(rankings),
        })
    }

    fn ranking_positions_since(&self, id: UserId, since: i64) -> RepoResult<Vec<u32>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.position
             FROM rankings r
             JOIN keywords k ON k.id = r.keyword_id
             JOIN projects p ON p.id = k.project_id
             WHERE p.user_id = ?1
               AND r.date >= ?2;",
        )?;
        let mut rows = stmt.query(params![id.to_string(), since])?;
        let mut positions = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: i64 = row.get(0)?;
            let position = u32::try_from(raw).map_err(|_| {
                RepoError::InvalidData(format!("invalid position `{raw}` in rankings.position"))
            })?;
            positions.push(position);
        }
        Ok(positions)
    }
}
