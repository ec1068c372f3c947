//! Request-scoped caller identity.
//!
//! The authentication collaborator resolves a session before a procedure
//! runs; handlers receive it through an explicit `RequestContext` value.

use crate::model::user::UserId;

/// Authenticated session established by the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

/// Per-request context threaded into every procedure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    session: Option<Session>,
}

impl RequestContext {
    /// Context for a caller without a session.
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn authenticated(user_id: UserId) -> Self {
        Self {
            session: Some(Session { user_id }),
        }
    }

    pub fn from_session(session: Option<Session>) -> Self {
        Self { session }
    }

    /// Caller user id, when a session exists.
    pub fn user_id(&self) -> Option<UserId> {
        self.session.map(|session| session.user_id)
    }
}
