//! Demo store serving canned dashboard data without a database.
//!
//! # Responsibility
//! - Implement the project and user repository contracts over a fixed
//!   in-memory dataset, selected at startup when no store is configured.
//!
//! # Invariants
//! - Nothing is persisted; mutations validate and echo their result.
//! - Canned projects appear owned by whichever user asks for them.
//! - Ranking dates are relative to call time so trailing windows stay
//!   populated.

use super::project_repo::{DetailLimits, ProjectRepository};
use super::user_repo::UserRepository;
use super::{RepoError, RepoResult};
use crate::model::project::{Project, ProjectId, ProjectPatch, ProjectSettings};
use crate::model::tracking::{Audit, Backlink, Keyword, Ranking};
use crate::model::user::{PlanType, User, UserId, UserPatch};
use crate::model::validation::{validate_domain, validate_project_name};
use crate::model::views::{
    KeywordWithRankings, ProfileProject, ProjectCounts, ProjectDetail, ProjectOverview,
    UserCounts, UserProfile,
};
use crate::model::{now_epoch_ms, DAY_MS};
use uuid::Uuid;

/// Id of the canned storefront project.
pub const DEMO_SHOP_PROJECT_ID: ProjectId = Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0001);
/// Id of the canned blog project.
pub const DEMO_BLOG_PROJECT_ID: ProjectId = Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0002);

/// Repository returning hardcoded mock data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoRepository;

impl DemoRepository {
    pub fn new() -> Self {
        Self
    }
}

struct DemoKeyword {
    seq: u128,
    term: &'static str,
    /// `(position, days_ago)`, newest first.
    rankings: &'static [(u32, i64)],
}

struct DemoProject {
    id: ProjectId,
    name: &'static str,
    domain: &'static str,
    age_days: i64,
    keywords: &'static [DemoKeyword],
    audit_scores: &'static [u8],
    backlink_sources: &'static [&'static str],
}

const DEMO_PROJECTS: &[DemoProject] = &[
    DemoProject {
        id: DEMO_BLOG_PROJECT_ID,
        name: "Demo Blog",
        domain: "https://blog.example.com",
        age_days: 3,
        keywords: &[DemoKeyword {
            seq: 0x21,
            term: "seo tips",
            rankings: &[(3, 1), (5, 40)],
        }],
        audit_scores: &[82],
        backlink_sources: &["https://news.example.org/roundup"],
    },
    DemoProject {
        id: DEMO_SHOP_PROJECT_ID,
        name: "Demo Shop",
        domain: "https://shop.example.com",
        age_days: 10,
        keywords: &[
            DemoKeyword {
                seq: 0x11,
                term: "running shoes",
                rankings: &[(4, 1), (7, 8)],
            },
            DemoKeyword {
                seq: 0x12,
                term: "trail shoes",
                rankings: &[(12, 2)],
            },
            DemoKeyword {
                seq: 0x13,
                term: "shoe care",
                rankings: &[],
            },
        ],
        audit_scores: &[74, 68],
        backlink_sources: &[
            "https://runners.example.net/gear",
            "https://forum.example.io/t/shoes",
        ],
    },
];

fn demo_user(id: UserId, now: i64) -> User {
    User {
        id,
        name: Some("Demo User".to_string()),
        email: Some("demo@example.com".to_string()),
        plan_type: PlanType::Professional,
        created_at: now - 30 * DAY_MS,
        updated_at: now - 30 * DAY_MS,
    }
}

/// Materializes the canned dataset for `owner`, newest project first.
fn dataset(owner: UserId, now: i64) -> Vec<ProjectDetail> {
    DEMO_PROJECTS
        .iter()
        .map(|demo| {
            let created_at = now - demo.age_days * DAY_MS;
            let keywords = demo
                .keywords
                .iter()
                .map(|keyword| {
                    let keyword_id = Uuid::from_u128(demo.id.as_u128() ^ (keyword.seq << 32));
                    KeywordWithRankings {
                        keyword: Keyword {
                            id: keyword_id,
                            project_id: demo.id,
                            term: keyword.term.to_string(),
                            created_at,
                        },
                        rankings: keyword
                            .rankings
                            .iter()
                            .enumerate()
                            .map(|(index, (position, days_ago))| Ranking {
                                id: Uuid::from_u128(keyword_id.as_u128() ^ (index as u128 + 1)),
                                keyword_id,
                                position: *position,
                                date: now - days_ago * DAY_MS,
                            })
                            .collect(),
                    }
                })
                .collect();
            let audits = demo
                .audit_scores
                .iter()
                .enumerate()
                .map(|(index, score)| Audit {
                    id: Uuid::from_u128(demo.id.as_u128() ^ (0xa0 + index as u128) << 16),
                    project_id: demo.id,
                    score: Some(*score),
                    created_at: now - (index as i64 + 1) * DAY_MS,
                })
                .collect();
            let backlinks = demo
                .backlink_sources
                .iter()
                .enumerate()
                .map(|(index, source)| Backlink {
                    id: Uuid::from_u128(demo.id.as_u128() ^ (0xb0 + index as u128) << 16),
                    project_id: demo.id,
                    source_url: (*source).to_string(),
                    target_url: demo.domain.to_string(),
                    discovered: now - (index as i64 + 1) * DAY_MS,
                })
                .collect();

            ProjectDetail {
                project: Project {
                    id: demo.id,
                    name: demo.name.to_string(),
                    domain: demo.domain.to_string(),
                    user_id: owner,
                    settings: ProjectSettings::new(),
                    created_at,
                    updated_at: created_at,
                },
                keywords,
                audits,
                backlinks,
            }
        })
        .collect()
}

fn counts_of(detail: &ProjectDetail) -> ProjectCounts {
    ProjectCounts {
        keywords: detail.keywords.len() as u64,
        audits: detail.audits.len() as u64,
        backlinks: detail.backlinks.len() as u64,
    }
}

fn truncate(mut detail: ProjectDetail, limits: &DetailLimits) -> ProjectDetail {
    for keyword in &mut detail.keywords {
        keyword
            .rankings
            .truncate(limits.rankings_per_keyword as usize);
    }
    detail.audits.truncate(limits.audits as usize);
    detail.backlinks.truncate(limits.backlinks as usize);
    detail
}

impl ProjectRepository for DemoRepository {
    fn list_projects(&self, owner: UserId) -> RepoResult<Vec<ProjectOverview>> {
        let latest_only = DetailLimits {
            rankings_per_keyword: 1,
            ..DetailLimits::default()
        };
        Ok(dataset(owner, now_epoch_ms())
            .into_iter()
            .map(|detail| {
                let counts = counts_of(&detail);
                let detail = truncate(detail, &latest_only);
                ProjectOverview {
                    project: detail.project,
                    counts,
                    keywords: detail.keywords,
                }
            })
            .collect())
    }

    fn get_project(
        &self,
        id: ProjectId,
        owner: UserId,
        limits: &DetailLimits,
    ) -> RepoResult<Option<ProjectDetail>> {
        Ok(dataset(owner, now_epoch_ms())
            .into_iter()
            .find(|detail| detail.project.id == id)
            .map(|detail| truncate(detail, limits)))
    }

    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        validate_project_name(&project.name)?;
        validate_domain(&project.domain)?;
        Ok(project.id)
    }

    fn update_project(
        &self,
        id: ProjectId,
        owner: UserId,
        patch: &ProjectPatch,
        now: i64,
    ) -> RepoResult<Project> {
        let mut project = dataset(owner, now)
            .into_iter()
            .find(|detail| detail.project.id == id)
            .map(|detail| detail.project)
            .ok_or(RepoError::NotFound(id))?;
        project.apply(patch, now)?;
        Ok(project)
    }

    fn delete_project(&self, id: ProjectId, _owner: UserId) -> RepoResult<()> {
        if DEMO_PROJECTS.iter().any(|demo| demo.id == id) {
            Ok(())
        } else {
            Err(RepoError::NotFound(id))
        }
    }
}

impl UserRepository for DemoRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(Some(demo_user(id, now_epoch_ms())))
    }

    fn get_profile(&self, id: UserId) -> RepoResult<Option<UserProfile>> {
        let now = now_epoch_ms();
        let projects = dataset(id, now)
            .into_iter()
            .map(|detail| ProfileProject {
                counts: counts_of(&detail),
                keywords: detail
                    .keywords
                    .into_iter()
                    .map(|item| item.keyword)
                    .collect(),
                project: detail.project,
            })
            .collect();
        Ok(Some(UserProfile {
            user: demo_user(id, now),
            projects,
        }))
    }

    fn update_user(&self, id: UserId, patch: &UserPatch, now: i64) -> RepoResult<User> {
        let mut user = demo_user(id, now);
        if let Some(name) = &patch.name {
            user.name = Some(name.clone());
        }
        if let Some(plan_type) = patch.plan_type {
            user.plan_type = plan_type;
        }
        user.updated_at = now;
        Ok(user)
    }

    fn count_owned(&self, id: UserId) -> RepoResult<UserCounts> {
        let projects = dataset(id, now_epoch_ms());
        Ok(UserCounts {
            project_count: projects.len() as u64,
            keyword_count: projects
                .iter()
                .map(|detail| detail.keywords.len() as u64)
                .sum(),
            total_rankings: projects
                .iter()
                .flat_map(|detail| &detail.keywords)
                .map(|item| item.rankings.len() as u64)
                .sum(),
        })
    }

    fn ranking_positions_since(&self, id: UserId, since: i64) -> RepoResult<Vec<u32>> {
        Ok(dataset(id, now_epoch_ms())
            .iter()
            .flat_map(|detail| &detail.keywords)
            .flat_map(|item| &item.rankings)
            .filter(|ranking| ranking.date >= since)
            .map(|ranking| ranking.position)
            .collect())
    }
}
