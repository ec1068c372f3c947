//! Tracking records populated by data-collection processes.
//!
//! # Invariants
//! - Keywords, backlinks and audits belong to exactly one project.
//! - Rankings belong to exactly one keyword and carry `position >= 1`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::ProjectId;
use super::validation::{is_absolute_url, ValidationError};

pub type KeywordId = Uuid;
pub type RankingId = Uuid;
pub type BacklinkId = Uuid;
pub type AuditId = Uuid;

/// A search term tracked within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: KeywordId,
    pub project_id: ProjectId,
    pub term: String,
    pub created_at: i64,
}

impl Keyword {
    pub fn new(
        project_id: ProjectId,
        term: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, ValidationError> {
        let term = term.into();
        if term.trim().is_empty() {
            return Err(ValidationError::BlankKeywordTerm);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            term,
            created_at,
        })
    }
}

/// A dated observation of a keyword's search-result position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub id: RankingId,
    pub keyword_id: KeywordId,
    /// 1 is the top search result.
    pub position: u32,
    pub date: i64,
}

impl Ranking {
    pub fn new(keyword_id: KeywordId, position: i64, date: i64) -> Result<Self, ValidationError> {
        let position = match u32::try_from(position) {
            Ok(value) if value >= 1 => value,
            _ => return Err(ValidationError::InvalidPosition(position)),
        };
        Ok(Self {
            id: Uuid::new_v4(),
            keyword_id,
            position,
            date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backlink {
    pub id: BacklinkId,
    pub project_id: ProjectId,
    pub source_url: String,
    pub target_url: String,
    pub discovered: i64,
}

impl Backlink {
    pub fn new(
        project_id: ProjectId,
        source_url: impl Into<String>,
        target_url: impl Into<String>,
        discovered: i64,
    ) -> Result<Self, ValidationError> {
        let source_url = source_url.into();
        let target_url = target_url.into();
        for (field, value) in [("sourceUrl", &source_url), ("targetUrl", &target_url)] {
            if !is_absolute_url(value) {
                return Err(ValidationError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            source_url,
            target_url,
            discovered,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub id: AuditId,
    pub project_id: ProjectId,
    /// Overall site score in `0..=100`, absent while an audit is pending.
    pub score: Option<u8>,
    pub created_at: i64,
}

impl Audit {
    pub fn new(
        project_id: ProjectId,
        score: Option<u32>,
        created_at: i64,
    ) -> Result<Self, ValidationError> {
        let score = match score {
            Some(value) if value <= 100 => Some(value as u8),
            Some(value) => return Err(ValidationError::InvalidAuditScore(value)),
            None => None,
        };
        Ok(Self {
            id: Uuid::new_v4(),
            project_id,
            score,
            created_at,
        })
    }
}
