//! `project.*` procedures.

use rankdash_core::{NewProject, ProjectRepository, ProjectService, RequestContext};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::envelope::ApiError;
use crate::procedure::{parse_project_id, Procedure, ProjectIdInput, UpdateProjectInput};

pub(crate) fn handle<R: ProjectRepository>(
    service: &ProjectService<R>,
    ctx: &RequestContext,
    procedure: Procedure,
    input: Value,
) -> Result<Value, ApiError> {
    match procedure {
        Procedure::ProjectGetAll => to_data(&service.list_projects(ctx)?),
        Procedure::ProjectGetById => {
            let input: ProjectIdInput = from_input(input)?;
            let id = parse_project_id(&input.id)?;
            to_data(&service.get_project(ctx, id)?)
        }
        Procedure::ProjectCreate => {
            let input: NewProject = from_input(input)?;
            to_data(&service.create_project(ctx, input)?)
        }
        Procedure::ProjectUpdate => {
            let input: UpdateProjectInput = from_input(input)?;
            let id = parse_project_id(&input.id)?;
            to_data(&service.update_project(ctx, id, &input.patch)?)
        }
        Procedure::ProjectDelete => {
            let input: ProjectIdInput = from_input(input)?;
            let id = parse_project_id(&input.id)?;
            service.delete_project(ctx, id)?;
            Ok(json!({ "success": true }))
        }
        other => Err(ApiError::not_found(format!(
            "No procedure `{}` on the project router",
            other.path()
        ))),
    }
}

pub(crate) fn from_input<T: DeserializeOwned>(input: Value) -> Result<T, ApiError> {
    serde_json::from_value(input).map_err(ApiError::invalid_input)
}

pub(crate) fn to_data<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|_| ApiError::internal())
}
