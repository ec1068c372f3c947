//! Project use-case service.
//!
//! # Responsibility
//! - Implement the `project.*` procedures on top of `ProjectRepository`.
//! - Derive `avg_position` for listings.
//!
//! # Invariants
//! - Listing without a session returns an empty list, not an error.
//! - Get/update/delete on a missing or foreign project are indistinguishable.

use super::aggregate::latest_position_average;
use super::{require_user, ServiceError, ServiceResult};
use crate::model::now_epoch_ms;
use crate::model::project::{NewProject, Project, ProjectId, ProjectPatch};
use crate::model::views::{ProjectDetail, ProjectListItem};
use crate::repo::project_repo::{DetailLimits, ProjectRepository};
use crate::repo::RepoError;
use crate::session::RequestContext;
use log::info;

/// Use-case service wrapper for project procedures.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
    limits: DetailLimits,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            limits: DetailLimits::default(),
        }
    }

    /// Lists the caller's projects, newest first, with counts and average.
    pub fn list_projects(&self, ctx: &RequestContext) -> ServiceResult<Vec<ProjectListItem>> {
        let Some(owner) = ctx.user_id() else {
            return Ok(Vec::new());
        };

        let items = self
            .repo
            .list_projects(owner)?
            .into_iter()
            .map(|overview| ProjectListItem {
                avg_position: latest_position_average(&overview.keywords),
                project: overview.project,
                keywords: overview.keywords,
                counts: overview.counts,
            })
            .collect();
        Ok(items)
    }

    /// Loads one owned project with keyword trends, audits and backlinks.
    pub fn get_project(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
    ) -> ServiceResult<ProjectDetail> {
        let owner = require_user(ctx)?;
        self.repo
            .get_project(id, owner, &self.limits)?
            .ok_or(ServiceError::NotFound("Project"))
    }

    /// Creates a project owned by the caller.
    ///
    /// # Contract
    /// - `input.domain` must already be an absolute URL.
    /// - Domains are not required to be unique.
    /// - A session without a user row fails with `NotFound("User")`.
    pub fn create_project(
        &self,
        ctx: &RequestContext,
        input: NewProject,
    ) -> ServiceResult<Project> {
        let owner = require_user(ctx)?;
        let project = Project::create(owner, input, now_epoch_ms())?;
        self.repo
            .create_project(&project)
            .map_err(|err| match err {
                RepoError::NotFound(_) => ServiceError::NotFound("User"),
                other => other.into(),
            })?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            project.id
        );
        Ok(project)
    }

    /// Partially updates an owned project.
    pub fn update_project(
        &self,
        ctx: &RequestContext,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> ServiceResult<Project> {
        let owner = require_user(ctx)?;
        patch.validate()?;
        self.repo
            .update_project(id, owner, patch, now_epoch_ms())
            .map_err(|err| collapse_not_found(err, id))
    }

    /// Deletes an owned project and its tracking rows.
    pub fn delete_project(&self, ctx: &RequestContext, id: ProjectId) -> ServiceResult<()> {
        let owner = require_user(ctx)?;
        self.repo
            .delete_project(id, owner)
            .map_err(|err| collapse_not_found(err, id))?;
        info!("event=project_delete module=service status=ok project_id={id}");
        Ok(())
    }
}

fn collapse_not_found(err: RepoError, id: ProjectId) -> ServiceError {
    match err {
        RepoError::NotFound(_) => ServiceError::NotFoundOrUnauthorized(id),
        other => other.into(),
    }
}
