use a2a_contract::{AgentMeta, CreateTask, ErrorPayload, TaskOutcome};
use async_trait::async_trait;

use crate::context::RequestContext;

/// Domain logic of one agent role.
///
/// The router has already validated the request and checked `task_type`
/// against [`meta`](Self::meta) before `execute` runs.
#[async_trait]
pub trait AgentService: Send + Sync + 'static {
    fn meta(&self) -> &AgentMeta;

    /// Run one task.
    ///
    /// `Ok` is stored as the task's terminal state and acknowledged with 200,
    /// even when the outcome is `Failed`. `Err` rejects the request: the task
    /// is recorded as failed and the payload becomes the response body, with
    /// the HTTP status of its code.
    async fn execute(
        &self,
        ctx: RequestContext,
        request: CreateTask,
    ) -> Result<TaskOutcome, ErrorPayload>;
}
