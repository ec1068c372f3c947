//! Shared SQL fragments and row decoders for SQLite repositories.

use super::{RepoError, RepoResult};
use crate::model::project::{Project, ProjectId, ProjectSettings};
use crate::model::tracking::{Audit, Backlink, Keyword, KeywordId, Ranking};
use crate::model::user::{PlanType, User, UserId};
use crate::model::views::{KeywordWithRankings, ProjectCounts};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use uuid::Uuid;

pub(crate) const PROJECT_SELECT_SQL: &str = "SELECT
    p.id AS id,
    p.name AS name,
    p.domain AS domain,
    p.user_id AS user_id,
    p.settings AS settings,
    p.created_at AS created_at,
    p.updated_at AS updated_at,
    (SELECT COUNT(*) FROM keywords k WHERE k.project_id = p.id) AS keyword_count,
    (SELECT COUNT(*) FROM audits a WHERE a.project_id = p.id) AS audit_count,
    (SELECT COUNT(*) FROM backlinks b WHERE b.project_id = p.id) AS backlink_count
FROM projects p";

pub(crate) const PROJECT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "domain",
    "user_id",
    "settings",
    "created_at",
    "updated_at",
];

pub(crate) const USER_COLUMNS: &[&str] = &[
    "id",
    "name",
    "email",
    "plan_type",
    "created_at",
    "updated_at",
];

pub(crate) fn parse_uuid(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

pub(crate) fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let settings_text: String = row.get("settings")?;
    let settings = serde_json::from_str::<ProjectSettings>(&settings_text).map_err(|err| {
        RepoError::InvalidData(format!("projects.settings is not a JSON object: {err}"))
    })?;

    Ok(Project {
        id: parse_uuid(row, "id")?,
        name: row.get("name")?,
        domain: row.get("domain")?,
        user_id: parse_uuid(row, "user_id")?,
        settings,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Decodes the `*_count` columns produced by `PROJECT_SELECT_SQL`.
pub(crate) fn parse_counts(row: &Row<'_>) -> RepoResult<ProjectCounts> {
    Ok(ProjectCounts {
        keywords: count_to_u64(row.get("keyword_count")?),
        audits: count_to_u64(row.get("audit_count")?),
        backlinks: count_to_u64(row.get("backlink_count")?),
    })
}

pub(crate) fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let plan_text: String = row.get("plan_type")?;
    let plan_type = PlanType::parse(&plan_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid plan type `{plan_text}` in users.plan_type"))
    })?;

    Ok(User {
        id: parse_uuid(row, "id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        plan_type,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn parse_keyword_row(row: &Row<'_>) -> RepoResult<Keyword> {
    Ok(Keyword {
        id: parse_uuid(row, "id")?,
        project_id: parse_uuid(row, "project_id")?,
        term: row.get("term")?,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn parse_ranking_row(row: &Row<'_>) -> RepoResult<Ranking> {
    let raw: i64 = row.get("position")?;
    let position = u32::try_from(raw)
        .ok()
        .filter(|value| *value >= 1)
        .ok_or_else(|| {
            RepoError::InvalidData(format!("invalid position `{raw}` in rankings.position"))
        })?;

    Ok(Ranking {
        id: parse_uuid(row, "id")?,
        keyword_id: parse_uuid(row, "keyword_id")?,
        position,
        date: row.get("date")?,
    })
}

pub(crate) fn parse_backlink_row(row: &Row<'_>) -> RepoResult<Backlink> {
    Ok(Backlink {
        id: parse_uuid(row, "id")?,
        project_id: parse_uuid(row, "project_id")?,
        source_url: row.get("source_url")?,
        target_url: row.get("target_url")?,
        discovered: row.get("discovered")?,
    })
}

pub(crate) fn parse_audit_row(row: &Row<'_>) -> RepoResult<Audit> {
    let score = match row.get::<_, Option<i64>>("score")? {
        Some(raw) => Some(u8::try_from(raw).ok().filter(|v| *v <= 100).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid score `{raw}` in audits.score"))
        })?),
        None => None,
    };

    Ok(Audit {
        id: parse_uuid(row, "id")?,
        project_id: parse_uuid(row, "project_id")?,
        score,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn settings_to_db(settings: &ProjectSettings) -> RepoResult<String> {
    serde_json::to_string(settings)
        .map_err(|err| RepoError::InvalidData(format!("settings cannot be encoded: {err}")))
}

pub(crate) fn count_to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Loads owned projects (newest first) with relation counts.
pub(crate) fn load_owned_projects(
    conn: &Connection,
    owner: UserId,
) -> RepoResult<Vec<(Project, ProjectCounts)>> {
    let mut stmt = conn.prepare(&format!(
        "{PROJECT_SELECT_SQL}
         WHERE p.user_id = ?1
         ORDER BY p.created_at DESC, p.rowid DESC;"
    ))?;
    let mut rows = stmt.query([owner.to_string()])?;
    let mut projects = Vec::new();
    while let Some(row) = rows.next()? {
        projects.push((parse_project_row(row)?, parse_counts(row)?));
    }
    Ok(projects)
}

/// Loads keywords of owned projects, optionally narrowed to one project.
///
/// Order is `created_at ASC` with insertion order as tiebreak.
pub(crate) fn load_keywords(
    conn: &Connection,
    owner: UserId,
    project: Option<ProjectId>,
) -> RepoResult<Vec<Keyword>> {
    let mut stmt = conn.prepare(
        "SELECT
            k.id AS id,
            k.project_id AS project_id,
            k.term AS term,
            k.created_at AS created_at
         FROM keywords k
         JOIN projects p ON p.id = k.project_id
         WHERE p.user_id = ?1
           AND (?2 IS NULL OR p.id = ?2)
         ORDER BY k.created_at ASC, k.rowid ASC;",
    )?;
    let mut rows = stmt.query(params![
        owner.to_string(),
        project.map(|id| id.to_string())
    ])?;
    let mut keywords = Vec::new();
    while let Some(row) = rows.next()? {
        keywords.push(parse_keyword_row(row)?);
    }
    Ok(keywords)
}

/// Loads the newest `per_keyword` rankings of every owned keyword.
///
/// Each vector is ordered newest first; equal dates fall back to insertion
/// order so the later observation wins.
pub(crate) fn load_recent_rankings(
    conn: &Connection,
    owner: UserId,
    project: Option<ProjectId>,
    per_keyword: u32,
) -> RepoResult<HashMap<KeywordId, Vec<Ranking>>> {
    let mut stmt = conn.prepare(
        "SELECT id, keyword_id, position, date
         FROM (
            SELECT
                r.id AS id,
                r.keyword_id AS keyword_id,
                r.position AS position,
                r.date AS date,
                ROW_NUMBER() OVER (
                    PARTITION BY r.keyword_id
                    ORDER BY r.date DESC, r.rowid DESC
                ) AS recency
            FROM rankings r
            JOIN keywords k ON k.id = r.keyword_id
            JOIN projects p ON p.id = k.project_id
            WHERE p.user_id = ?1
              AND (?2 IS NULL OR p.id = ?2)
         )
         WHERE recency <= ?3
         ORDER BY keyword_id ASC, recency ASC;",
    )?;
    let mut rows = stmt.query(params![
        owner.to_string(),
        project.map(|id| id.to_string()),
        i64::from(per_keyword)
    ])?;
    let mut by_keyword: HashMap<KeywordId, Vec<Ranking>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let ranking = parse_ranking_row(row)?;
        by_keyword.entry(ranking.keyword_id).or_default().push(ranking);
    }
    Ok(by_keyword)
}

pub(crate) fn attach_rankings(
    keywords: Vec<Keyword>,
    rankings: &mut HashMap<KeywordId, Vec<Ranking>>,
) -> Vec<KeywordWithRankings> {
    keywords
        .into_iter()
        .map(|keyword| {
            let rankings = rankings.remove(&keyword.id).unwrap_or_default();
            KeywordWithRankings { keyword, rankings }
        })
        .collect()
}
