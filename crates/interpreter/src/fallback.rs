use std::sync::Arc;

use async_trait::async_trait;

use crate::error::InterpretError;
use crate::input::QuoteInput;

/// One interpretation strategy.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, utterance: &str) -> Result<QuoteInput, InterpretError>;
}

/// Runs `primary`, and `secondary` whenever the primary fails or produces
/// input that does not normalize.
pub struct FallbackInterpreter {
    primary: Arc<dyn Interpreter>,
    secondary: Arc<dyn Interpreter>,
}

impl FallbackInterpreter {
    pub fn new(primary: Arc<dyn Interpreter>, secondary: Arc<dyn Interpreter>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl Interpreter for FallbackInterpreter {
    async fn interpret(&self, utterance: &str) -> Result<QuoteInput, InterpretError> {
        if utterance.trim().is_empty() {
            return Err(InterpretError::MissingUtterance);
        }
        match self
            .primary
            .interpret(utterance)
            .await
            .and_then(QuoteInput::normalize)
        {
            Ok(input) => Ok(input),
            Err(e) => {
                tracing::warn!(error = %e, "primary interpretation failed, falling back");
                self.secondary.interpret(utterance).await?.normalize()
            }
        }
    }
}
