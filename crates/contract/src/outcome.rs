use serde_json::Value;

use crate::codes::ErrorPayload;
use crate::task::TaskUpdate;

/// Terminal result reported by an agent after executing a task.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskOutcome {
    Succeeded { result: Value },
    Failed { error: ErrorPayload },
}

impl TaskOutcome {
    pub fn succeeded(result: Value) -> Self {
        Self::Succeeded { result }
    }

    pub fn failed(error: ErrorPayload) -> Self {
        Self::Failed { error }
    }
}

impl From<TaskOutcome> for TaskUpdate {
    fn from(outcome: TaskOutcome) -> Self {
        match outcome {
            TaskOutcome::Succeeded { result } => TaskUpdate::Succeeded(result),
            TaskOutcome::Failed { error } => TaskUpdate::Failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::ErrorCode;
    use serde_json::json;

    #[test]
    fn succeeded_maps_to_update() {
        let update: TaskUpdate = TaskOutcome::succeeded(json!({"price": 10000})).into();
        assert_eq!(update, TaskUpdate::Succeeded(json!({"price": 10000})));
    }

    #[test]
    fn failed_wire_format() {
        let outcome = TaskOutcome::failed(ErrorPayload::new(ErrorCode::Internal, "carrier down"));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "FAILED");
        assert_eq!(json["error"]["code"], "INTERNAL");
    }
}
