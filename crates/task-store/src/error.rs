use a2a_contract::{ContractError, ErrorCode, ErrorPayload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskStoreError {
    #[error("task not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("{0}")]
    Other(String),
}

impl TaskStoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Contract(e) => e.code(),
            Self::Other(_) => ErrorCode::Internal,
        }
    }
}

impl From<TaskStoreError> for ErrorPayload {
    fn from(e: TaskStoreError) -> Self {
        ErrorPayload::new(e.code(), e.to_string())
    }
}
