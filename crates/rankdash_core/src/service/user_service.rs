//! User use-case service.
//!
//! # Responsibility
//! - Implement the `user.*` procedures on top of `UserRepository`.
//! - Compute user-wide statistics over the trailing ranking window.
//!
//! # Invariants
//! - `get_stats` without a session returns all-zero stats.
//! - The stats average weighs every ranking row in the window equally.

use super::aggregate::{mean_position, stats_window_start};
use super::{require_user, ServiceError, ServiceResult};
use crate::model::now_epoch_ms;
use crate::model::user::{User, UserPatch};
use crate::model::views::{UserProfile, UserStats};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::session::RequestContext;

/// Use-case service wrapper for user procedures.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Caller profile with nested projects.
    pub fn get_profile(&self, ctx: &RequestContext) -> ServiceResult<UserProfile> {
        let user_id = require_user(ctx)?;
        self.repo
            .get_profile(user_id)?
            .ok_or(ServiceError::NotFound("User"))
    }

    /// Updates caller name and/or plan tier.
    pub fn update_profile(&self, ctx: &RequestContext, patch: &UserPatch) -> ServiceResult<User> {
        let user_id = require_user(ctx)?;
        match self.repo.update_user(user_id, patch, now_epoch_ms()) {
            Ok(user) => Ok(user),
            Err(RepoError::NotFound(_)) => Err(ServiceError::NotFound("User")),
            Err(err) => Err(err.into()),
        }
    }

    /// Statistics as of the current wall-clock time.
    pub fn get_stats(&self, ctx: &RequestContext) -> ServiceResult<UserStats> {
        self.get_stats_at(ctx, now_epoch_ms())
    }

    /// Statistics with the trailing window ending at `now` (epoch ms).
    pub fn get_stats_at(&self, ctx: &RequestContext, now: i64) -> ServiceResult<UserStats> {
        let Some(user_id) = ctx.user_id() else {
            return Ok(UserStats::default());
        };

        let counts = self.repo.count_owned(user_id)?;
        let recent = self
            .repo
            .ranking_positions_since(user_id, stats_window_start(now))?;

        Ok(UserStats {
            project_count: counts.project_count,
            keyword_count: counts.keyword_count,
            total_rankings: counts.total_rankings,
            avg_position: mean_position(recent),
        })
    }
}
