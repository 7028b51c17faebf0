use std::time::Duration;

use tokio::time::Instant;

/// Per-request data handed to [`AgentService::execute`](crate::AgentService::execute).
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Propagated `X-Agent-Trace-Id`, or a fresh one when the caller sent none.
    pub trace_id: String,
    /// Point after which the caller no longer waits for an answer.
    pub deadline: Instant,
}

impl RequestContext {
    pub fn new(trace_id: Option<String>, timeout: Duration) -> Self {
        Self {
            trace_id: trace_id.unwrap_or_else(new_trace_id),
            deadline: Instant::now() + timeout,
        }
    }
}

pub(crate) fn new_trace_id() -> String {
    format!("tr_{}", ulid::Ulid::new().to_string().to_lowercase())
}
