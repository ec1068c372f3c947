//! Response envelope and error-code mapping.
//!
//! # Invariants
//! - `ok == true` implies `data` is set and `error` is absent.
//! - Store failures never leak their details to the caller.

use log::error;
use rankdash_core::{RepoError, ServiceError};
use serde::Serialize;
use serde_json::Value;

/// Transport-level error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    NotFound,
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Error payload carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub(crate) fn invalid_input(err: serde_json::Error) -> Self {
        Self::bad_request(format!("invalid input: {err}"))
    }

    pub(crate) fn internal() -> Self {
        Self::new(ErrorCode::InternalServerError, "Internal server error")
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::bad_request(err.to_string()),
            ServiceError::Unauthenticated => {
                Self::new(ErrorCode::Unauthorized, "Authentication required")
            }
            err @ (ServiceError::NotFound(_) | ServiceError::NotFoundOrUnauthorized(_)) => {
                Self::not_found(err.to_string())
            }
            ServiceError::Repo(RepoError::Validation(err)) => Self::bad_request(err.to_string()),
            ServiceError::Repo(err) => {
                error!("event=store_failure module=api status=error error={err}");
                Self::internal()
            }
        }
    }
}

/// `{ok, data?, error?}` envelope returned by every procedure call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl RpcResponse {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }

    /// Error code of a failed response.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|error| error.code)
    }

    /// Splits the envelope back into its payload or error.
    pub fn into_result(self) -> Result<Value, ApiError> {
        match (self.data, self.error) {
            (_, Some(error)) => Err(error),
            (Some(data), None) => Ok(data),
            (None, None) => Ok(Value::Null),
        }
    }

    /// Serializes the envelope as a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"ok":false,"error":{"code":"INTERNAL_SERVER_ERROR","message":"Internal server error"}}"#
                .to_string()
        })
    }
}

impl From<Result<Value, ApiError>> for RpcResponse {
    fn from(value: Result<Value, ApiError>) -> Self {
        match value {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, ErrorCode, RpcResponse};
    use rankdash_core::db::DbError;
    use rankdash_core::{RepoError, ServiceError, ValidationError};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn service_errors_map_to_transport_codes() {
        let cases = [
            (
                ServiceError::Validation(ValidationError::BlankProjectName),
                ErrorCode::BadRequest,
            ),
            (ServiceError::Unauthenticated, ErrorCode::Unauthorized),
            (ServiceError::NotFound("Project"), ErrorCode::NotFound),
            (
                ServiceError::NotFoundOrUnauthorized(Uuid::new_v4()),
                ErrorCode::NotFound,
            ),
            (
                ServiceError::Repo(RepoError::Db(DbError::MissingRequiredTable("projects"))),
                ErrorCode::InternalServerError,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).code, expected);
        }
    }

    #[test]
    fn ownership_failure_keeps_its_message() {
        let error = ApiError::from(ServiceError::NotFoundOrUnauthorized(Uuid::new_v4()));
        assert_eq!(error.message, "Project not found or unauthorized");
    }

    #[test]
    fn store_failure_message_is_generic() {
        let error = ApiError::from(ServiceError::Repo(RepoError::InvalidData(
            "bad row".to_string(),
        )));
        assert_eq!(error.message, "Internal server error");
    }

    #[test]
    fn envelope_omits_absent_members() {
        let ok = serde_json::to_value(RpcResponse::success(json!({"success": true}))).unwrap();
        assert_eq!(ok, json!({"ok": true, "data": {"success": true}}));

        let failed =
            serde_json::to_value(RpcResponse::failure(ApiError::not_found("gone"))).unwrap();
        assert_eq!(
            failed,
            json!({"ok": false, "error": {"code": "NOT_FOUND", "message": "gone"}})
        );
    }
}
