//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide ownership-scoped CRUD over `projects`.
//! - Load listing/detail read models with nested keywords and rankings.
//!
//! # Invariants
//! - Every query filters by owning `user_id`; foreign rows are invisible.
//! - Update/delete run as one conditional statement and report
//!   `RepoError::NotFound` when zero rows match.

use super::rows::{
    attach_rankings, load_keywords, load_owned_projects, load_recent_rankings,
    parse_audit_row, parse_backlink_row, parse_project_row, settings_to_db,
    PROJECT_COLUMNS, PROJECT_SELECT_SQL,
};
use super::{RepoError, RepoResult};
use crate::db::ensure_schema_ready;
use crate::model::project::{Project, ProjectId, ProjectPatch};
use crate::model::tracking::{Audit, Backlink};
use crate::model::user::UserId;
use crate::model::validation::{validate_domain, validate_project_name};
use crate::model::views::{KeywordWithRankings, ProjectDetail, ProjectOverview};
use rusqlite::{params, Connection};
use std::collections::HashMap;

/// Nested-collection limits for single-project fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLimits {
    /// Rankings kept per keyword, newest first.
    pub rankings_per_keyword: u32,
    /// Most recent audits kept.
    pub audits: u32,
    /// Most recently discovered backlinks kept.
    pub backlinks: u32,
}

impl Default for DetailLimits {
    fn default() -> Self {
        Self {
            rankings_per_keyword: 30,
            audits: 5,
            backlinks: 100,
        }
    }
}

/// Repository interface for project data access.
pub trait ProjectRepository {
    /// Owned projects, newest first, each keyword carrying only its latest
    /// ranking.
    fn list_projects(&self, owner: UserId) -> RepoResult<Vec<ProjectOverview>>;
    /// One owned project with nested collections, or `None`.
    fn get_project(
        &self,
        id: ProjectId,
        owner: UserId,
        limits: &DetailLimits,
    ) -> RepoResult<Option<ProjectDetail>>;
    /// Persists a new project and returns its id. A missing owner row
    /// reports `RepoError::NotFound(owner)`.
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Applies `patch` to an owned project and returns the stored result.
    fn update_project(
        &self,
        id: ProjectId,
        owner: UserId,
        patch: &ProjectPatch,
        now: i64,
    ) -> RepoResult<Project>;
    /// Deletes an owned project together with its tracking rows.
    fn delete_project(&self, id: ProjectId, owner: UserId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "projects", PROJECT_COLUMNS)?;
        Ok(Self { conn })
    }

    fn load_project(&self, id: ProjectId, owner: UserId) -> RepoResult<Option<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE p.id = ?1 AND p.user_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_project_row(row)?)),
            None => Ok(None),
        }
    }

    fn load_audits(&self, id: ProjectId, limit: u32) -> RepoResult<Vec<Audit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, score, created_at
             FROM audits
             WHERE project_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![id.to_string(), i64::from(limit)])?;
        let mut audits = Vec::new();
        while let Some(row) = rows.next()? {
            audits.push(parse_audit_row(row)?);
        }
        Ok(audits)
    }

    fn load_backlinks(&self, id: ProjectId, limit: u32) -> RepoResult<Vec<Backlink>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, source_url, target_url, discovered
             FROM backlinks
             WHERE project_id = ?1
             ORDER BY discovered DESC, rowid DESC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![id.to_string(), i64::from(limit)])?;
        let mut backlinks = Vec::new();
        while let Some(row) = rows.next()? {
            backlinks.push(parse_backlink_row(row)?);
        }
        Ok(backlinks)
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn list_projects(&self, owner: UserId) -> RepoResult<Vec<ProjectOverview>> {
        let projects = load_owned_projects(self.conn, owner)?;
        let keywords = load_keywords(self.conn, owner, None)?;
        let mut latest = load_recent_rankings(self.conn, owner, None, 1)?;
        let mut by_project: HashMap<ProjectId, Vec<KeywordWithRankings>> = HashMap::new();
        for item in attach_rankings(keywords, &mut latest) {
            by_project
                .entry(item.keyword.project_id)
                .or_default()
                .push(item);
        }

        let overviews = projects
            .into_iter()
            .map(|(project, counts)| ProjectOverview {
                keywords: by_project.remove(&project.id).unwrap_or_default(),
                project,
                counts,
            })
            .collect();

        Ok(overviews)
    }

    fn get_project(
        &self,
        id: ProjectId,
        owner: UserId,
        limits: &DetailLimits,
    ) -> RepoResult<Option<ProjectDetail>> {
        let Some(project) = self.load_project(id, owner)? else {
            return Ok(None);
        };

        let keywords = load_keywords(self.conn, owner, Some(id))?;
        let mut rankings =
            load_recent_rankings(self.conn, owner, Some(id), limits.rankings_per_keyword)?;

        Ok(Some(ProjectDetail {
            project,
            keywords: attach_rankings(keywords, &mut rankings),
            audits: self.load_audits(id, limits.audits)?,
            backlinks: self.load_backlinks(id, limits.backlinks)?,
        }))
    }

    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        validate_project_name(&project.name)?;
        validate_domain(&project.domain)?;

        let changed = self.conn.execute(
            "INSERT INTO projects (
                id,
                user_id,
                name,
                domain,
                settings,
                created_at,
                updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7
            WHERE EXISTS (SELECT 1 FROM users WHERE id = ?2);",
            params![
                project.id.to_string(),
                project.user_id.to_string(),
                project.name.as_str(),
                project.domain.as_str(),
                settings_to_db(&project.settings)?,
                project.created_at,
                project.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(project.user_id));
        }

        Ok(project.id)
    }

    fn update_project(
        &self,
        id: ProjectId,
        owner: UserId,
        patch: &ProjectPatch,
        now: i64,
    ) -> RepoResult<Project> {
        patch.validate()?;
        let settings = match &patch.settings {
            Some(settings) => Some(settings_to_db(settings)?),
            None => None,
        };

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = COALESCE(?3, name),
                domain = COALESCE(?4, domain),
                settings = COALESCE(?5, settings),
                updated_at = ?6
             WHERE id = ?1 AND user_id = ?2;",
            params![
                id.to_string(),
                owner.to_string(),
                patch.name.as_deref(),
                patch.domain.as_deref(),
                settings,
                now,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        self.load_project(id, owner)?.ok_or(RepoError::NotFound(id))
    }

    fn delete_project(&self, id: ProjectId, owner: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM projects WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}
