use a2a_contract::{ErrorCode, ErrorPayload};

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    #[error("missing utterance")]
    MissingUtterance,

    #[error("llm request failed: {0}")]
    Llm(String),

    #[error("llm returned no choices")]
    NoChoices,

    #[error("unparseable interpretation: {0}")]
    Parse(String),

    #[error("incomplete interpretation: {0}")]
    Incomplete(String),
}

impl InterpretError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Llm(_) | Self::NoChoices => ErrorCode::Internal,
            Self::MissingUtterance | Self::Parse(_) | Self::Incomplete(_) => {
                ErrorCode::ValidationFailed
            }
        }
    }
}

impl From<InterpretError> for ErrorPayload {
    fn from(e: InterpretError) -> Self {
        ErrorPayload::new(e.code(), e.to_string())
    }
}
