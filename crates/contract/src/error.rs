use crate::codes::{ErrorCode, ErrorPayload};

/// Errors raised while validating or mutating contract values.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl ContractError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::InvalidTransition { .. } => ErrorCode::Conflict,
        }
    }
}

impl From<ContractError> for ErrorPayload {
    fn from(e: ContractError) -> Self {
        ErrorPayload::new(e.code(), e.to_string())
    }
}
