//! Core domain logic for the RankDash SEO dashboard.
//! This crate is the single source of truth for ownership and ranking
//! invariants; API and CLI layers only adapt its services.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::project::{NewProject, Project, ProjectId, ProjectPatch, ProjectSettings};
pub use model::tracking::{Audit, Backlink, Keyword, KeywordId, Ranking};
pub use model::user::{PlanType, User, UserId, UserPatch};
pub use model::validation::ValidationError;
pub use model::views::{
    KeywordWithRankings, ProfileProject, ProjectCounts, ProjectDetail, ProjectListItem,
    UserProfile, UserStats,
};
pub use repo::demo::DemoRepository;
pub use repo::project_repo::{DetailLimits, ProjectRepository, SqliteProjectRepository};
pub use repo::tracking_repo::{SqliteTrackingRepository, TrackingRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::project_service::ProjectService;
pub use service::user_service::UserService;
pub use service::{ServiceError, ServiceResult};
pub use session::{RequestContext, Session};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
