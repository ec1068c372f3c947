//! `user.*` procedures.

use rankdash_core::{RequestContext, UserPatch, UserRepository, UserService};
use serde_json::Value;

use crate::envelope::ApiError;
use crate::procedure::{Procedure, UpdateProfileInput};
use crate::project_router::{from_input, to_data};

pub(crate) fn handle<R: UserRepository>(
    service: &UserService<R>,
    ctx: &RequestContext,
    procedure: Procedure,
    input: Value,
) -> Result<Value, ApiError> {
    match procedure {
        Procedure::UserGetProfile => to_data(&service.get_profile(ctx)?),
        Procedure::UserUpdateProfile => {
            let input: UpdateProfileInput = from_input(input)?;
            to_data(&service.update_profile(ctx, &UserPatch::from(input))?)
        }
        Procedure::UserGetStats => to_data(&service.get_stats(ctx)?),
        other => Err(ApiError::not_found(format!(
            "No procedure `{}` on the user router",
            other.path()
        ))),
    }
}
