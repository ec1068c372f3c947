//! Tracking-data ingestion for keywords, rankings, backlinks and audits.
//!
//! # Responsibility
//! - Give data-collection processes a write path into the store.
//! - Keep parent existence checks inside the insert statement.
//!
//! # Invariants
//! - Inserts against a missing parent report `RepoError::NotFound(parent)`.
//! - Records are validated by their constructors before reaching SQL.

use super::{RepoError, RepoResult};
use crate::db::ensure_schema_ready;
use crate::model::tracking::{Audit, Backlink, Keyword, KeywordId, Ranking};
use rusqlite::{params, Connection};
use uuid::Uuid;

/// Repository interface for tracking-data ingestion.
pub trait TrackingRepository {
    fn add_keyword(&self, keyword: &Keyword) -> RepoResult<KeywordId>;
    fn record_ranking(&self, ranking: &Ranking) -> RepoResult<Uuid>;
    fn add_backlink(&self, backlink: &Backlink) -> RepoResult<Uuid>;
    fn add_audit(&self, audit: &Audit) -> RepoResult<Uuid>;
}

/// SQLite-backed tracking repository.
pub struct SqliteTrackingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackingRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, "keywords", &["id", "project_id", "term", "created_at"])?;
        ensure_schema_ready(conn, "rankings", &["id", "keyword_id", "position", "date"])?;
        ensure_schema_ready(
            conn,
            "backlinks",
            &["id", "project_id", "source_url", "target_url", "discovered"],
        )?;
        ensure_schema_ready(conn, "audits", &["id", "project_id", "score", "created_at"])?;
        Ok(Self { conn })
    }
}

impl TrackingRepository for SqliteTrackingRepository<'_> {
    fn add_keyword(&self, keyword: &Keyword) -> RepoResult<KeywordId> {
        let changed = self.conn.execute(
            "INSERT INTO keywords (id, project_id, term, created_at)
             SELECT ?1, ?2, ?3, ?4
             WHERE EXISTS (SELECT 1 FROM projects WHERE id = ?2);",
            params![
                keyword.id.to_string(),
                keyword.project_id.to_string(),
                keyword.term.as_str(),
                keyword.created_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(keyword.project_id));
        }
        Ok(keyword.id)
    }

    fn record_ranking(&self, ranking: &Ranking) -> RepoResult<Uuid> {
        let changed = self.conn.execute(
            "INSERT INTO rankings (id, keyword_id, position, date)
             SELECT ?1, ?2, ?3, ?4
             WHERE EXISTS (SELECT 1 FROM keywords WHERE id = ?2);",
            params![
                ranking.id.to_string(),
                ranking.keyword_id.to_string(),
                i64::from(ranking.position),
                ranking.date,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(ranking.keyword_id));
        }
        Ok(ranking.id)
    }

    fn add_backlink(&self, backlink: &Backlink) -> RepoResult<Uuid> {
        let changed = self.conn.execute(
            "INSERT INTO backlinks (id, project_id, source_url, target_url, discovered)
             SELECT ?1, ?2, ?3, ?4, ?5
             WHERE EXISTS (SELECT 1 FROM projects WHERE id = ?2);",
            params![
                backlink.id.to_string(),
                backlink.project_id.to_string(),
                backlink.source_url.as_str(),
                backlink.target_url.as_str(),
                backlink.discovered,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(backlink.project_id));
        }
        Ok(backlink.id)
    }

    fn add_audit(&self, audit: &Audit) -> RepoResult<Uuid> {
        let changed = self.conn.execute(
            "INSERT INTO audits (id, project_id, score, created_at)
             SELECT ?1, ?2, ?3, ?4
             WHERE EXISTS (SELECT 1 FROM projects WHERE id = ?2);",
            params![
                audit.id.to_string(),
                audit.project_id.to_string(),
                audit.score.map(i64::from),
                audit.created_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(audit.project_id));
        }
        Ok(audit.id)
    }
}
