//! Procedure catalog: dotted paths, kinds and input payloads.

use rankdash_core::{PlanType, ProjectId, ProjectPatch, UserPatch};
use serde::Deserialize;
use uuid::Uuid;

use crate::envelope::ApiError;

/// Whether a procedure reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

/// Every procedure exposed by the `project` and `user` routers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    ProjectGetAll,
    ProjectGetById,
    ProjectCreate,
    ProjectUpdate,
    ProjectDelete,
    UserGetProfile,
    UserUpdateProfile,
    UserGetStats,
}

impl Procedure {
    pub const ALL: [Procedure; 8] = [
        Self::ProjectGetAll,
        Self::ProjectGetById,
        Self::ProjectCreate,
        Self::ProjectUpdate,
        Self::ProjectDelete,
        Self::UserGetProfile,
        Self::UserUpdateProfile,
        Self::UserGetStats,
    ];

    /// Resolves a dotted path such as `project.getAll`. Matching is exact.
    pub fn parse(path: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|procedure| procedure.path() == path)
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::ProjectGetAll => "project.getAll",
            Self::ProjectGetById => "project.getById",
            Self::ProjectCreate => "project.create",
            Self::ProjectUpdate => "project.update",
            Self::ProjectDelete => "project.delete",
            Self::UserGetProfile => "user.getProfile",
            Self::UserUpdateProfile => "user.updateProfile",
            Self::UserGetStats => "user.getStats",
        }
    }

    /// Collection reads degrade to empty results without a session; every
    /// other procedure rejects anonymous callers.
    pub fn requires_session(self) -> bool {
        !matches!(self, Self::ProjectGetAll | Self::UserGetStats)
    }

    pub fn kind(self) -> ProcedureKind {
        match self {
            Self::ProjectGetAll
            | Self::ProjectGetById
            | Self::UserGetProfile
            | Self::UserGetStats => ProcedureKind::Query,
            Self::ProjectCreate
            | Self::ProjectUpdate
            | Self::ProjectDelete
            | Self::UserUpdateProfile => ProcedureKind::Mutation,
        }
    }
}

/// `{id}` input of `project.getById` and `project.delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectIdInput {
    pub id: String,
}

/// `{id, name?, domain?, settings?}` input of `project.update`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectInput {
    pub id: String,
    #[serde(flatten)]
    pub patch: ProjectPatch,
}

/// `{name?, planType?}` input of `user.updateProfile`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plan_type: Option<PlanType>,
}

impl From<UpdateProfileInput> for UserPatch {
    fn from(value: UpdateProfileInput) -> Self {
        Self {
            name: value.name,
            plan_type: value.plan_type,
        }
    }
}

/// Parses a project id. A malformed id cannot match any row, so it is
/// reported the same way as a missing project.
pub fn parse_project_id(raw: &str) -> Result<ProjectId, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found("Project not found"))
}
