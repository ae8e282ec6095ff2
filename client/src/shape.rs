//! Response shaping.
//!
//! A decoded body is either tagged (`_type: success | error`) or handed back
//! untouched, depending on the [`ResponseShape`] configured for the
//! operation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use types::{is_error_body, LndError};

use crate::error::ClientError;
use crate::operation::Operation;

/// How a decoded body is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Insert a `_type` tag derived from the presence of an `error` field
    #[default]
    Normalized,
    /// Return the body exactly as decoded; callers inspect fields themselves
    PassThrough,
}

/// Take the payload out of a `{"result": ...}` envelope.
///
/// An envelope carrying `error` instead is returned whole so the error
/// survives shaping.
pub fn unwrap_result(operation: Operation, body: Value) -> Result<Value, ClientError> {
    if !operation.unwraps_result() {
        return Ok(body);
    }
    match body {
        Value::Object(mut map) if map.contains_key("result") => {
            Ok(map.remove("result").unwrap_or(Value::Null))
        }
        body if is_error_body(&body) => Ok(body),
        _ => Err(ClientError::MissingResult(operation)),
    }
}

/// Apply `shape` to a decoded body for `operation`.
///
/// Under [`ResponseShape::Normalized`] a nested streaming error
/// (`{"error": {...}}`) is flattened into the [`LndError`] record first, so
/// the tagged output matches what the typed methods return.
pub fn apply(
    operation: Operation,
    shape: ResponseShape,
    body: Value,
) -> Result<Value, ClientError> {
    let payload = unwrap_result(operation, body)?;
    match shape {
        ResponseShape::Normalized if operation.unwraps_result() && is_error_body(&payload) => {
            let record = serde_json::to_value(LndError::from_body(payload)?)?;
            Ok(types::tag_value(record)?)
        }
        ResponseShape::Normalized => Ok(types::tag_value(payload)?),
        ResponseShape::PassThrough => Ok(payload),
    }
}
