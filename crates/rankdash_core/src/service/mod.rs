//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into procedure-level use-cases.
//! - Apply session policy and collapse ownership failures.
//! - Keep the API layer decoupled from storage details.
//!
//! # Invariants
//! - Collection reads (`list_projects`, `get_stats`) degrade to empty/zero
//!   without a session; every other use-case requires one.
//! - Update/delete never reveal whether a foreign project exists.

pub mod aggregate;
pub mod project_service;
pub mod user_service;

use crate::model::project::ProjectId;
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use crate::session::RequestContext;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by use-case services.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed input.
    Validation(ValidationError),
    /// Procedure requires a session and none was supplied.
    Unauthenticated,
    /// No owned row matched a read.
    NotFound(&'static str),
    /// Mutation matched zero rows: missing and foreign are indistinguishable.
    NotFoundOrUnauthorized(ProjectId),
    /// Store failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::NotFoundOrUnauthorized(_) => write!(f, "Project not found or unauthorized"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Unauthenticated => None,
            Self::NotFound(_) => None,
            Self::NotFoundOrUnauthorized(_) => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Returns the caller id or fails with `ServiceError::Unauthenticated`.
pub(crate) fn require_user(ctx: &RequestContext) -> ServiceResult<UserId> {
    ctx.user_id().ok_or(ServiceError::Unauthenticated)
}
