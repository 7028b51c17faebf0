use serde_json::Value;

use crate::error::ContractError;
use crate::task::CreateTask;

/// Structural check only. `input` contents are the receiving agent's business.
pub fn validate_create_task(ct: &CreateTask) -> Result<(), ContractError> {
    if ct.task_type.is_empty() {
        return Err(ContractError::ValidationFailed(
            "task_type is required".to_string(),
        ));
    }
    if is_empty_input(&ct.input) {
        return Err(ContractError::ValidationFailed(
            "input is required".to_string(),
        ));
    }
    Ok(())
}

/// Absent, `null`, `""`, `[]` and `{}` all count as no input.
pub fn is_empty_input(input: &Value) -> bool {
    match input {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
