use a2a_contract::{ContractError, ErrorPayload};
use a2a_task_store::TaskStoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error response of the agent surface: an [`ErrorPayload`] body with the
/// status of its code.
#[derive(Debug)]
pub struct ApiError(pub ErrorPayload);

impl From<ErrorPayload> for ApiError {
    fn from(payload: ErrorPayload) -> Self {
        Self(payload)
    }
}

impl From<ContractError> for ApiError {
    fn from(e: ContractError) -> Self {
        Self(e.into())
    }
}

impl From<TaskStoreError> for ApiError {
    fn from(e: TaskStoreError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}
