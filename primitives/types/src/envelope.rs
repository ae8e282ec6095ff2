//! Response envelope
//!
//! LND reports application failures inside the JSON body rather than through
//! the HTTP status. Every normalized call therefore inspects the decoded body
//! and tags it: a body carrying an `error` field becomes
//! [`LndResponse::Error`], anything else [`LndResponse::Success`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the discriminant inserted into normalized JSON results.
pub const TYPE_TAG: &str = "_type";

/// Name of the body field whose presence marks a remote error.
pub const ERROR_FIELD: &str = "error";

/// Errors raised while reshaping a decoded body into an envelope.
#[derive(Debug, Error)]
pub enum TypesError {
    /// The body did not match the expected record layout.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Tagging requires a JSON object to insert `_type` into.
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Error record reported by LND in a response body.
///
/// Fields are forwarded verbatim; any that LND leaves out default to empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LndError {
    /// Short error string (`"invalid request"`, ...)
    #[serde(default)]
    pub error: String,
    /// Human readable message
    #[serde(default)]
    pub message: String,
    /// Numeric gRPC status code
    #[serde(default)]
    pub code: i64,
    /// Additional detail entries
    #[serde(default)]
    pub details: Vec<Value>,
}

impl LndError {
    /// Build the error record from a body known to carry an `error` field.
    ///
    /// Streaming endpoints nest the record as `{"error": {...}}`; in that case
    /// the inner object is the record, and its `error` string falls back to
    /// the message when LND leaves it out.
    pub fn from_body(body: Value) -> Result<Self, TypesError> {
        match body {
            Value::Object(mut map) => match map.remove(ERROR_FIELD) {
                Some(Value::Object(inner)) => {
                    let mut record: LndError = serde_json::from_value(Value::Object(inner))?;
                    if record.error.is_empty() {
                        record.error = record.message.clone();
                    }
                    Ok(record)
                }
                Some(other) => {
                    map.insert(ERROR_FIELD.to_string(), other);
                    Ok(serde_json::from_value(Value::Object(map))?)
                }
                None => Ok(serde_json::from_value(Value::Object(map))?),
            },
            other => Err(TypesError::NotAnObject(json_kind(&other))),
        }
    }
}

impl std::fmt::Display for LndError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {}): {}", self.error, self.code, self.message)
    }
}

/// Discriminated result of a normalized call.
///
/// Serializes with a `_type` tag next to the payload fields, so a balance
/// success renders as `{"_type":"success","total_balance":"100",...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum LndResponse<T> {
    /// The node accepted the request; operation-specific payload.
    Success(T),
    /// The node reported an error in the body.
    Error(LndError),
}

impl<T: DeserializeOwned> LndResponse<T> {
    /// Normalize a decoded body.
    ///
    /// The tag is derived solely from the presence of an `error` field.
    pub fn from_value(body: Value) -> Result<Self, TypesError> {
        if is_error_body(&body) {
            return Ok(LndResponse::Error(LndError::from_body(body)?));
        }
        Ok(LndResponse::Success(serde_json::from_value(body)?))
    }
}

impl<T> LndResponse<T> {
    /// Whether this is the success variant.
    pub fn is_success(&self) -> bool { matches!(self, LndResponse::Success(_)) }

    /// Whether this is the error variant.
    pub fn is_error(&self) -> bool { matches!(self, LndResponse::Error(_)) }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, LndError> {
        match self {
            LndResponse::Success(v) => Ok(v),
            LndResponse::Error(e) => Err(e),
        }
    }

    /// Map the success payload, leaving errors untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LndResponse<U> {
        match self {
            LndResponse::Success(v) => LndResponse::Success(f(v)),
            LndResponse::Error(e) => LndResponse::Error(e),
        }
    }
}

/// Returns true if the body carries a non-null `error` field.
pub fn is_error_body(body: &Value) -> bool {
    body.get(ERROR_FIELD).is_some_and(|e| !e.is_null())
}

/// Insert the `_type` discriminant into a decoded body, keeping every other
/// field as received.
///
/// A `_type` already present in the body is replaced; the tag depends only on
/// the `error` field.
pub fn tag_value(body: Value) -> Result<Value, TypesError> {
    let tag = if is_error_body(&body) { "error" } else { "success" };
    match body {
        Value::Object(map) => {
            let mut tagged = Map::with_capacity(map.len() + 1);
            tagged.insert(TYPE_TAG.to_string(), Value::String(tag.to_string()));
            tagged.extend(map.into_iter().filter(|(key, _)| key != TYPE_TAG));
            Ok(Value::Object(tagged))
        }
        other => Err(TypesError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_is_error_body() {
        assert!(is_error_body(&json!({"error": "boom"})));
        assert!(is_error_body(&json!({"error": ""})));
        assert!(is_error_body(&json!({"error": {"code": 2}})));
        assert!(!is_error_body(&json!({"error": null})));
        assert!(!is_error_body(&json!({"balance": "1"})));
        assert!(!is_error_body(&json!([1, 2])));
    }

    #[test]
    fn test_tag_value() {
        let tagged = tag_value(json!({"txid": "abc"})).expect("object body");
        assert_eq!(tagged, json!({"_type": "success", "txid": "abc"}));

        let tagged = tag_value(json!({"error": "x", "code": 1})).expect("object body");
        assert_eq!(tagged["_type"], "error");
        assert_eq!(tagged["code"], 1);

        let spoofed = tag_value(json!({"_type": "success", "error": "boom", "code": 2}))
            .expect("object body");
        assert_eq!(spoofed, json!({"_type": "error", "error": "boom", "code": 2}));

        let stale = tag_value(json!({"_type": "error", "balance": "1"})).expect("object body");
        assert_eq!(stale, json!({"_type": "success", "balance": "1"}));

        match tag_value(json!("nope")) {
            Err(TypesError::NotAnObject(kind)) => assert_eq!(kind, "a string"),
            other => panic!("expected NotAnObject, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_error_object() {
        let body = json!({"error": {"code": 2, "message": "payment failed", "details": []}});
        let err = LndError::from_body(body).expect("nested error decodes");
        assert_eq!(err.code, 2);
        assert_eq!(err.message, "payment failed");
        assert_eq!(err.error, "payment failed");

        let body = json!({"error": {"error": "insufficient_balance", "message": "m", "code": 2}});
        let err = LndError::from_body(body).expect("nested error decodes");
        assert_eq!(err.error, "insufficient_balance");
    }

    #[test]
    fn test_into_result_and_map() {
        let ok: LndResponse<u32> = LndResponse::Success(2);
        assert_eq!(ok.map(|v| v * 2).into_result().expect("success"), 4);

        let err: LndResponse<u32> = LndResponse::Error(LndError {
            error: "e".to_string(),
            message: "m".to_string(),
            code: 5,
            details: vec![],
        });
        assert!(err.is_error());
        assert_eq!(err.into_result().expect_err("error").to_string(), "e (code 5): m");
    }
}
