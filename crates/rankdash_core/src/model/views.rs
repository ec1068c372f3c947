//! Read models returned by listing, detail, profile and stats use-cases.
//!
//! Field names follow the dashboard wire format: camelCase, with relation
//! counts under `_count`.

use serde::{Deserialize, Serialize};

use super::project::Project;
use super::tracking::{Audit, Backlink, Keyword, Ranking};
use super::user::User;

/// Number of related rows per project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCounts {
    pub keywords: u64,
    pub audits: u64,
    pub backlinks: u64,
}

/// Keyword plus its most recent rankings, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordWithRankings {
    #[serde(flatten)]
    pub keyword: Keyword,
    pub rankings: Vec<Ranking>,
}

impl KeywordWithRankings {
    /// Most recent ranking, if any was recorded.
    pub fn latest(&self) -> Option<&Ranking> {
        self.rankings.first()
    }
}

/// Store-level listing row: a project with counts and latest rankings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOverview {
    pub project: Project,
    pub counts: ProjectCounts,
    /// Every keyword of the project, each with at most its latest ranking.
    pub keywords: Vec<KeywordWithRankings>,
}

/// `project.getAll` item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListItem {
    #[serde(flatten)]
    pub project: Project,
    pub keywords: Vec<KeywordWithRankings>,
    #[serde(rename = "_count")]
    pub counts: ProjectCounts,
    /// Mean of latest positions; `0.0` means no ranking data.
    pub avg_position: f64,
}

/// `project.getById` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub keywords: Vec<KeywordWithRankings>,
    pub audits: Vec<Audit>,
    pub backlinks: Vec<Backlink>,
}

/// Project as nested in the user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileProject {
    #[serde(flatten)]
    pub project: Project,
    pub keywords: Vec<Keyword>,
    #[serde(rename = "_count")]
    pub counts: ProjectCounts,
}

/// `user.getProfile` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub projects: Vec<ProfileProject>,
}

/// Raw counters gathered by the store for `user.getStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserCounts {
    pub project_count: u64,
    pub keyword_count: u64,
    pub total_rankings: u64,
}

/// `user.getStats` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub project_count: u64,
    pub keyword_count: u64,
    pub total_rankings: u64,
    /// Mean over every ranking in the trailing window; `0.0` means no data.
    pub avg_position: f64,
}
