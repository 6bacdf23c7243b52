//! Standard API error response types
//!
//! Every error response carries a `detail` array so that validation
//! failures over multiple fields can be reported in one round trip.
//! The overall HTTP status is the maximum status of the details.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single error entry in an error response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. `USERNAME_TOO_SHORT`
    #[serde(rename = "type")]
    pub kind: String,

    /// Human-readable message
    pub msg: String,

    /// Location of the offending value, e.g. `["body", "username"]`
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub loc: Vec<String>,

    /// The rejected input value, when safe to echo back
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub input: Option<Value>,

    /// Additional context for the error
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ctx: Option<Value>,
}

impl ErrorDetail {
    /// Create a detail with just a code and message
    pub fn new(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            msg: msg.into(),
            loc: Vec::new(),
            input: None,
            ctx: None,
        }
    }

    /// Attach a location path
    pub fn with_loc(mut self, loc: Vec<String>) -> Self {
        self.loc = loc;
        self
    }

    /// Attach the rejected input value
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Attach extra context
    pub fn with_ctx(mut self, ctx: Value) -> Self {
        self.ctx = Some(ctx);
        self
    }
}

/// Error response body: `{"detail": [...]}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub detail: Vec<ErrorDetail>,
}

impl ErrorBody {
    pub fn new(detail: Vec<ErrorDetail>) -> Self {
        Self { detail }
    }

    pub fn single(detail: ErrorDetail) -> Self {
        Self {
            detail: vec![detail],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_detail_serializes_type_tag() {
        let detail = ErrorDetail::new("USERNAME_TOO_SHORT", "username is too short")
            .with_loc(vec!["body".to_string(), "username".to_string()])
            .with_input(json!("ab"));
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["type"], "USERNAME_TOO_SHORT");
        assert_eq!(value["loc"], json!(["body", "username"]));
        assert_eq!(value["input"], json!("ab"));
        assert!(value.get("ctx").is_none());
    }

    #[test]
    fn test_error_body_wraps_details() {
        let body = ErrorBody::single(ErrorDetail::new("UNAUTHORIZED", "not signed in"));
        let value = serde_json::to_value(&body).unwrap();
        assert!(value["detail"].is_array());
        assert_eq!(value["detail"][0]["type"], "UNAUTHORIZED");
    }

    #[test]
    fn test_empty_loc_is_omitted() {
        let detail = ErrorDetail::new("SERVER_ERROR", "internal error");
        let value = serde_json::to_value(&detail).unwrap();
        assert!(value.get("loc").is_none());
    }
}
