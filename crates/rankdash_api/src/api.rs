//! Procedure dispatcher over the `project` and `user` routers.
//!
//! # Responsibility
//! - Resolve procedure paths and route them with the caller context.
//! - Wrap every outcome in the `{ok, data?, error?}` envelope.
//!
//! # Invariants
//! - `call` never panics and always returns an envelope.
//! - Unknown paths answer `NOT_FOUND`.
//! - Anonymous callers of protected procedures answer `UNAUTHORIZED`
//!   regardless of their input.
//! - Log lines carry metadata only, never input payloads.

use log::{info, warn};
use rankdash_core::{
    DemoRepository, ProjectRepository, ProjectService, RepoResult, RequestContext, ServiceError,
    SqliteProjectRepository, SqliteUserRepository, UserRepository, UserService,
};
use rusqlite::Connection;
use serde_json::Value;
use std::time::Instant;

use crate::envelope::{ApiError, RpcResponse};
use crate::procedure::Procedure;
use crate::{project_router, user_router};

/// Procedure surface bound to one project store and one user store.
pub struct Api<P: ProjectRepository, U: UserRepository> {
    projects: ProjectService<P>,
    users: UserService<U>,
}

impl<P: ProjectRepository, U: UserRepository> Api<P, U> {
    pub fn new(project_repo: P, user_repo: U) -> Self {
        Self {
            projects: ProjectService::new(project_repo),
            users: UserService::new(user_repo),
        }
    }

    /// Invokes the procedure at `path` with a JSON `input`.
    ///
    /// Procedures without input ignore `input`; pass `Value::Null`.
    pub fn call(&self, ctx: &RequestContext, path: &str, input: Value) -> RpcResponse {
        let Some(procedure) = Procedure::parse(path) else {
            warn!("event=rpc_call module=api status=unknown_procedure");
            return RpcResponse::failure(ApiError::not_found(format!(
                "No procedure found on path `{path}`"
            )));
        };

        let started = Instant::now();
        let result = self.dispatch(ctx, procedure, input);
        let duration_ms = started.elapsed().as_millis();
        match &result {
            Ok(_) => info!(
                "event=rpc_call module=api procedure={} kind={} status=ok duration_ms={duration_ms}",
                procedure.path(),
                procedure.kind().as_str(),
            ),
            Err(error) => warn!(
                "event=rpc_call module=api procedure={} kind={} status=error code={} duration_ms={duration_ms}",
                procedure.path(),
                procedure.kind().as_str(),
                error.code.as_str(),
            ),
        }
        result.into()
    }

    /// Like [`Api::call`], with the input given as JSON text.
    ///
    /// Empty text is treated as no input.
    pub fn call_json(&self, ctx: &RequestContext, path: &str, input: &str) -> RpcResponse {
        let input = if input.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(input) {
                Ok(value) => value,
                Err(err) => return RpcResponse::failure(ApiError::invalid_input(err)),
            }
        };
        self.call(ctx, path, input)
    }

    fn dispatch(
        &self,
        ctx: &RequestContext,
        procedure: Procedure,
        input: Value,
    ) -> Result<Value, ApiError> {
        // Session is checked before the input is decoded or ids are parsed.
        if procedure.requires_session() && ctx.user_id().is_none() {
            return Err(ServiceError::Unauthenticated.into());
        }

        match procedure {
            Procedure::ProjectGetAll
            | Procedure::ProjectGetById
            | Procedure::ProjectCreate
            | Procedure::ProjectUpdate
            | Procedure::ProjectDelete => {
                project_router::handle(&self.projects, ctx, procedure, input)
            }
            Procedure::UserGetProfile | Procedure::UserUpdateProfile | Procedure::UserGetStats => {
                user_router::handle(&self.users, ctx, procedure, input)
            }
        }
    }
}

impl Api<DemoRepository, DemoRepository> {
    /// Surface backed by canned mock data.
    pub fn demo() -> Self {
        Self::new(DemoRepository::new(), DemoRepository::new())
    }
}

impl<'conn> Api<SqliteProjectRepository<'conn>, SqliteUserRepository<'conn>> {
    /// Surface backed by a migrated SQLite connection.
    pub fn sqlite(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteProjectRepository::try_new(conn)?,
            SqliteUserRepository::try_new(conn)?,
        ))
    }
}
