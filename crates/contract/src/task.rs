use serde_json::{Map, Value};

use crate::codes::ErrorPayload;
use crate::error::ContractError;
use crate::ids::TaskId;
use crate::status::TaskStatus;

/// Request to delegate a unit of work to an agent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CreateTask {
    /// Selects the agent capability, e.g. `QUOTE`, `SHIP`, `INTERPRET`.
    #[serde(default)]
    pub task_type: String,
    /// Domain-specific payload. Opaque at this layer.
    #[serde(default)]
    pub input: Value,
    /// Where to POST the completion [`Event`] when the work finishes asynchronously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl CreateTask {
    pub fn new(task_type: impl Into<String>, input: Value) -> Self {
        Self {
            task_type: task_type.into(),
            input,
            reply_url: None,
            idempotency_key: None,
            meta: None,
        }
    }

    #[must_use]
    pub fn with_reply_url(mut self, url: impl Into<String>) -> Self {
        self.reply_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Current state of a unit of work.
///
/// `result` is set only when `SUCCEEDED`, `error` only when `FAILED`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl Task {
    pub fn pending(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            result: None,
            error: None,
        }
    }

    pub fn succeeded(task_id: TaskId, result: Value) -> Self {
        Self {
            task_id,
            status: TaskStatus::Succeeded,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(task_id: TaskId, error: ErrorPayload) -> Self {
        Self {
            task_id,
            status: TaskStatus::Failed,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Apply an update through the transition table. On error the task is unchanged.
    pub fn apply(&mut self, update: TaskUpdate) -> Result<(), ContractError> {
        self.status = self.status.transition_to(update.status())?;
        match update {
            TaskUpdate::Running => {}
            TaskUpdate::Succeeded(result) => self.result = Some(result),
            TaskUpdate::Failed(error) => self.error = Some(error),
        }
        Ok(())
    }

    pub fn ack(&self) -> TaskAck {
        TaskAck {
            task_id: self.task_id.clone(),
            status: self.status,
        }
    }
}

/// A requested status change, carrying the data that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskUpdate {
    Running,
    Succeeded(Value),
    Failed(ErrorPayload),
}

impl TaskUpdate {
    pub fn status(&self) -> TaskStatus {
        match self {
            Self::Running => TaskStatus::Running,
            Self::Succeeded(_) => TaskStatus::Succeeded,
            Self::Failed(_) => TaskStatus::Failed,
        }
    }
}

/// Body of a successful `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TaskAck {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    TaskCompleted,
    TaskFailed,
    TaskProgress,
}

/// Asynchronous notification about a task owned by the receiver.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub event: EventKind,
    pub task_id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Event {
    pub fn completed(task_id: TaskId, result: Value) -> Self {
        Self {
            event: EventKind::TaskCompleted,
            task_id,
            payload: Some(result),
        }
    }

    pub fn failed(task_id: TaskId, error: &ErrorPayload) -> Self {
        Self {
            event: EventKind::TaskFailed,
            task_id,
            payload: serde_json::to_value(error).ok(),
        }
    }

    pub fn progress(task_id: TaskId) -> Self {
        Self {
            event: EventKind::TaskProgress,
            task_id,
            payload: None,
        }
    }

    /// The status change this event asks the receiver to make.
    pub fn into_update(self) -> TaskUpdate {
        match self.event {
            EventKind::TaskProgress => TaskUpdate::Running,
            EventKind::TaskCompleted => TaskUpdate::Succeeded(self.payload.unwrap_or(Value::Null)),
            EventKind::TaskFailed => {
                let error = self
                    .payload
                    .and_then(|p| serde_json::from_value::<ErrorPayload>(p).ok())
                    .unwrap_or_else(|| ErrorPayload::internal("remote task failed"));
                TaskUpdate::Failed(error)
            }
        }
    }
}
