use a2a_agent::{AgentClient, AgentService, RequestContext};
use a2a_contract::{AgentMeta, CreateTask, ErrorPayload, TaskOutcome, TaskStatus, task_types};
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;

use crate::config::ConciergeConfig;
use crate::fanout::gather_quotes;
use crate::interpret::{needs_interpretation, utterance_for};

pub struct ConciergeService {
    meta: AgentMeta,
    config: ConciergeConfig,
    client: AgentClient,
}

impl ConciergeService {
    /// `client` carries the concierge's own signing identity for downstream calls.
    pub fn new(agent_id: impl Into<String>, config: ConciergeConfig, client: AgentClient) -> Self {
        let meta = AgentMeta::new(agent_id, "Concierge", env!("CARGO_PKG_VERSION"))
            .with_capability(task_types::QUOTE, "QuoteRequest | Utterance", "QuoteAggregate")
            .with_capability(task_types::SHIP, "ShipRequest", "ShipResult");
        Self {
            meta,
            config,
            client,
        }
    }

    async fn quote(&self, ctx: &RequestContext, input: Value) -> Result<TaskOutcome, ErrorPayload> {
        let input = if needs_interpretation(&input) {
            self.interpret(ctx, &input).await?
        } else {
            input
        };

        let deadline = (Instant::now() + self.config.aggregation_timeout).min(ctx.deadline);
        let report = gather_quotes(
            &self.client,
            &self.config.pricing_agents,
            &input,
            &ctx.trace_id,
            deadline,
        )
        .await;
        tracing::info!(
            trace_id = %ctx.trace_id,
            quotes = report.quotes.len(),
            failures = report.partial_failures.len(),
            "quote aggregated"
        );

        let result = serde_json::to_value(&report)
            .map_err(|e| ErrorPayload::internal(format!("encode quotes: {e}")))?;
        Ok(TaskOutcome::succeeded(result))
    }

    /// Structured quote input from the interpreter. Any failure here fails
    /// the whole request as `VALIDATION_FAILED`.
    async fn interpret(&self, ctx: &RequestContext, input: &Value) -> Result<Value, ErrorPayload> {
        let request = CreateTask::new(
            task_types::INTERPRET,
            json!({ "utterance": utterance_for(input) }),
        );
        let task = self
            .client
            .run_task(&self.config.interpreter, &request, Some(&ctx.trace_id))
            .await
            .map_err(|e| ErrorPayload::validation(format!("interpret failed: {e}")))?;

        match (task.status, task.result) {
            (TaskStatus::Succeeded, Some(structured)) => {
                tracing::debug!(trace_id = %ctx.trace_id, "quote input interpreted");
                Ok(structured)
            }
            (status, _) => {
                let reason = task
                    .error
                    .map_or_else(|| format!("interpreter status {status}"), |e| e.to_string());
                Err(ErrorPayload::validation(format!("interpret failed: {reason}")))
            }
        }
    }

    async fn ship(&self, ctx: &RequestContext, request: &CreateTask) -> TaskOutcome {
        let mut delegated = CreateTask::new(task_types::SHIP, request.input.clone());
        delegated.idempotency_key = request.idempotency_key.clone();

        let outcome = tokio::time::timeout_at(
            ctx.deadline,
            self.client
                .run_task(&self.config.ship_agent, &delegated, Some(&ctx.trace_id)),
        )
        .await;

        let failure = match outcome {
            Ok(Ok(task)) if task.status == TaskStatus::Succeeded => {
                return TaskOutcome::succeeded(task.result.unwrap_or(Value::Null));
            }
            Ok(Ok(task)) => task
                .error
                .map_or_else(|| "ship task failed".to_string(), |e| e.to_string()),
            Ok(Err(e)) => e.to_string(),
            Err(_) => "ship agent did not answer before the request deadline".to_string(),
        };
        tracing::warn!(trace_id = %ctx.trace_id, error = %failure, "ship delegation failed");
        TaskOutcome::failed(ErrorPayload::internal(failure))
    }
}

#[async_trait]
impl AgentService for ConciergeService {
    fn meta(&self) -> &AgentMeta {
        &self.meta
    }

    async fn execute(
        &self,
        ctx: RequestContext,
        request: CreateTask,
    ) -> Result<TaskOutcome, ErrorPayload> {
        match request.task_type.as_str() {
            task_types::QUOTE => self.quote(&ctx, request.input).await,
            task_types::SHIP => Ok(self.ship(&ctx, &request).await),
            other => Err(ErrorPayload::validation(format!(
                "unsupported task_type: {other}"
            ))),
        }
    }
}
