//! Remote-procedure surface of the RankDash dashboard.
//!
//! # Responsibility
//! - Map dotted procedure paths (`project.*`, `user.*`) onto core services.
//! - Translate service errors into transport error codes.
//!
//! # See also
//! - `rankdash_core::service` for the use-case semantics.

mod api;
pub mod envelope;
pub mod procedure;
mod project_router;
mod user_router;

pub use api::Api;
pub use envelope::{ApiError, ErrorCode, RpcResponse};
pub use procedure::{Procedure, ProcedureKind};
