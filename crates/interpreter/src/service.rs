use std::sync::Arc;

use a2a_agent::{AgentService, RequestContext};
use a2a_contract::{AgentMeta, CreateTask, ErrorPayload, TaskOutcome, task_types};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::InterpretError;
use crate::fallback::Interpreter;

/// Serves `INTERPRET`: `{"utterance": "..."}` in, `QuoteInput` out.
pub struct InterpretService {
    meta: AgentMeta,
    interpreter: Arc<dyn Interpreter>,
}

impl InterpretService {
    pub fn new(agent_id: impl Into<String>, interpreter: Arc<dyn Interpreter>) -> Self {
        let meta = AgentMeta::new(agent_id, "Interpreter", env!("CARGO_PKG_VERSION"))
            .with_capability(task_types::INTERPRET, "Utterance", "QuoteRequest");
        Self { meta, interpreter }
    }
}

#[async_trait]
impl AgentService for InterpretService {
    fn meta(&self) -> &AgentMeta {
        &self.meta
    }

    async fn execute(
        &self,
        ctx: RequestContext,
        request: CreateTask,
    ) -> Result<TaskOutcome, ErrorPayload> {
        let utterance = request
            .input
            .get("utterance")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(InterpretError::MissingUtterance)?;

        let input = self.interpreter.interpret(utterance).await?.normalize()?;
        tracing::info!(
            trace_id = %ctx.trace_id,
            from = %input.from.country,
            to = %input.to.country,
            weight_kg = input.parcel.weight_kg,
            "utterance interpreted"
        );
        let result = serde_json::to_value(&input)
            .map_err(|e| ErrorPayload::internal(format!("encode interpretation: {e}")))?;
        Ok(TaskOutcome::succeeded(result))
    }
}
