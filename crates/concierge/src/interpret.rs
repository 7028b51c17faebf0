use serde_json::Value;

const REQUIRED_FIELDS: [&str; 3] = ["from", "to", "parcel"];

/// A `QUOTE` input needs interpretation when it carries free text or lacks
/// any of `from`, `to` and `parcel`.
pub fn needs_interpretation(input: &Value) -> bool {
    match input.as_object() {
        Some(fields) => {
            fields.contains_key("utterance")
                || REQUIRED_FIELDS.iter().any(|f| !fields.contains_key(*f))
        }
        None => true,
    }
}

/// The `utterance` handed to the interpreter: the caller's own value when
/// present, of whatever type, otherwise the input as text.
pub fn utterance_for(input: &Value) -> Value {
    match input {
        Value::Object(fields) => match fields.get("utterance") {
            Some(utterance) => utterance.clone(),
            None => Value::String(input.to_string()),
        },
        Value::String(_) => input.clone(),
        other => Value::String(other.to_string()),
    }
}
