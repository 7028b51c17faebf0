use std::collections::HashMap;

use a2a_agent::{AgentClient, ClientError};
use a2a_contract::{CreateTask, ErrorCode, ErrorPayload, Task, TaskStatus, task_types};
use serde::Serialize;
use serde_json::Value;
use tokio::task::{self, JoinSet};
use tokio::time::Instant;

/// Aggregated `QUOTE` result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuoteReport {
    /// Successful answers in arrival order.
    pub quotes: Vec<Value>,
    pub partial_failures: Vec<BranchFailure>,
}

/// A pricing agent that failed or missed the deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchFailure {
    pub agent: String,
    pub code: ErrorCode,
    pub message: String,
}

impl BranchFailure {
    fn new(agent: &str, error: ErrorPayload) -> Self {
        Self {
            agent: agent.to_string(),
            code: error.code,
            message: error.message,
        }
    }
}

/// Ask every agent in `agents` for a quote on `input` and collect answers
/// until all have answered or `deadline` passes.
///
/// Branches run independently; one failing never affects the others.
/// Branches still running at the deadline are aborted and reported as
/// `TIMEOUT`. Nothing here writes to a task store.
pub async fn gather_quotes(
    client: &AgentClient,
    agents: &[String],
    input: &Value,
    trace_id: &str,
    deadline: Instant,
) -> QuoteReport {
    let request = CreateTask::new(task_types::QUOTE, input.clone());
    let trace_id = trace_id.to_string();
    gather(agents, deadline, |agent| {
        let client = client.clone();
        let request = request.clone();
        let trace_id = trace_id.clone();
        async move { client.run_task(&agent, &request, Some(&trace_id)).await }
    })
    .await
}

async fn gather<F, Fut>(agents: &[String], deadline: Instant, branch: F) -> QuoteReport
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Task, ClientError>> + Send + 'static,
{
    let mut branches = JoinSet::new();
    let mut branch_agents: HashMap<task::Id, usize> = HashMap::with_capacity(agents.len());
    for (index, agent) in agents.iter().enumerate() {
        let handle = branches.spawn(branch(agent.clone()));
        branch_agents.insert(handle.id(), index);
    }

    let mut report = QuoteReport::default();
    let mut answered = vec![false; agents.len()];
    loop {
        let next = tokio::time::timeout_at(deadline, branches.join_next_with_id()).await;
        let (id, joined) = match next {
            Ok(Some(Ok((id, outcome)))) => (id, Ok(outcome)),
            Ok(Some(Err(e))) => (e.id(), Err(e)),
            Ok(None) | Err(_) => break,
        };
        let Some(&index) = branch_agents.get(&id) else {
            continue;
        };
        answered[index] = true;
        let agent = &agents[index];

        match joined {
            Ok(Ok(task)) if task.status == TaskStatus::Succeeded => {
                report.quotes.push(task.result.unwrap_or(Value::Null));
            }
            Ok(Ok(task)) => {
                let error = task
                    .error
                    .unwrap_or_else(|| ErrorPayload::internal("quote task failed"));
                tracing::warn!(agent = %agent, error = %error, "quote branch failed");
                report.partial_failures.push(BranchFailure::new(agent, error));
            }
            Ok(Err(e)) => {
                tracing::warn!(agent = %agent, error = %e, "quote branch failed");
                report
                    .partial_failures
                    .push(BranchFailure::new(agent, e.to_payload()));
            }
            Err(e) => {
                tracing::error!(agent = %agent, error = %e, "quote branch crashed");
                report.partial_failures.push(BranchFailure::new(
                    agent,
                    ErrorPayload::internal(format!("quote branch crashed: {e}")),
                ));
            }
        }
    }
    branches.abort_all();

    // Only branches cut off by the deadline are left unanswered.
    for (agent, _) in agents.iter().zip(&answered).filter(|(_, done)| !**done) {
        let error = ErrorPayload::new(ErrorCode::Timeout, "no answer before aggregation deadline");
        tracing::warn!(agent = %agent, code = %error.code, "quote branch dropped");
        report.partial_failures.push(BranchFailure::new(agent, error));
    }

    tracing::debug!(
        quotes = report.quotes.len(),
        failures = report.partial_failures.len(),
        "quotes gathered"
    );
    report
}
