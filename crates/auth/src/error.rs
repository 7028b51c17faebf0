use a2a_contract::{ErrorCode, ErrorPayload};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing A2A headers")]
    MissingHeaders,

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed request time: {0}")]
    MalformedTimestamp(String),

    #[error("request time skewed by {skew_secs}s")]
    ClockSkew { skew_secs: i64 },

    #[error("read body failed: {0}")]
    Body(String),

    #[error("invalid secret table entry: {0}")]
    InvalidSecretEntry(String),
}

impl AuthError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Body(_) | Self::InvalidSecretEntry(_) => ErrorCode::ValidationFailed,
            _ => ErrorCode::Unauthorized,
        }
    }
}

impl From<&AuthError> for ErrorPayload {
    fn from(e: &AuthError) -> Self {
        ErrorPayload::new(e.code(), e.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let payload = ErrorPayload::from(&self);
        let status = StatusCode::from_u16(payload.code.http_status())
            .unwrap_or(StatusCode::UNAUTHORIZED);
        (status, Json(payload)).into_response()
    }
}
