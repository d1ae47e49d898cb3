use crate::error::{RuntimeError, ShuntError, SyntaxError};
use crate::value::Value;
use crate::ShuntResult;
use std::collections::HashMap;

/// Parse a JSON object into a constant table.
///
/// Each top-level key becomes a constant. JSON arrays become positional
/// arrays and nested objects become keyed arrays.
pub fn from_json(json: &[u8]) -> ShuntResult<HashMap<String, Value>> {
    let parsed: serde_json::Value = serde_json::from_slice(json).map_err(|e| {
        ShuntError::syntax(
            SyntaxError::UnexpectedInput,
            format!("JSON parse error: {}", e),
        )
    })?;

    match parsed {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        other => Err(ShuntError::runtime(
            RuntimeError::InvalidOperand,
            format!("expected a JSON object of constants, got {}", json_type(&other)),
        )
        .with_suggestion("wrap the values in an object, e.g. {\"price\": 10}")),
    }
}

/// Render a value as a JSON string
pub fn to_json(value: &Value) -> ShuntResult<String> {
    serde_json::to_string(value).map_err(|e| {
        ShuntError::runtime(
            RuntimeError::InvalidOperand,
            format!("cannot represent {} as JSON: {}", value.type_name(), e),
        )
    })
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
