//! JSON payload checks against an action's recovered body fields
//!
//! Only top-level fields are checked: required presence, undeclared keys,
//! and the JSON kind of each value. Array element types and nested object
//! fields are not validated.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::spec::{Action, ActionBodyField};

/// What went wrong with one body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingField,
    UnknownField,
    TypeMismatch,
    InvalidJson,
}

/// A single problem found in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyIssue {
    pub kind: IssueKind,
    /// Field name; empty for `InvalidJson`
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl BodyIssue {
    fn missing(field: &str) -> Self {
        Self {
            kind: IssueKind::MissingField,
            field: field.to_string(),
            expected: None,
            actual: None,
        }
    }

    fn unknown(field: &str) -> Self {
        Self {
            kind: IssueKind::UnknownField,
            field: field.to_string(),
            expected: None,
            actual: None,
        }
    }

    fn mismatch(field: &str, expected: &str, actual: &Value) -> Self {
        Self {
            kind: IssueKind::TypeMismatch,
            field: field.to_string(),
            expected: Some(expected.to_string()),
            actual: Some(json_kind(actual).to_string()),
        }
    }

    fn invalid_json(reason: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::InvalidJson,
            field: String::new(),
            expected: Some("object".to_string()),
            actual: Some(reason.into()),
        }
    }
}

impl fmt::Display for BodyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::MissingField => write!(f, "missing required field {:?}", self.field),
            IssueKind::UnknownField => write!(f, "unknown field {:?}", self.field),
            IssueKind::TypeMismatch => write!(
                f,
                "field {:?} expects {}, got {}",
                self.field,
                self.expected.as_deref().unwrap_or_default(),
                self.actual.as_deref().unwrap_or_default()
            ),
            IssueKind::InvalidJson => write!(
                f,
                "body must be a JSON object: {}",
                self.actual.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Check `body` against the action's declared top-level body fields.
///
/// Never fails; an empty list means the body is acceptable. A blank body, or
/// an action without recovered body fields, yields no issues.
pub fn validate_body_parameters(action: &Action, body: &[u8]) -> Vec<BodyIssue> {
    let fields = match &action.request_body {
        Some(rb) if !rb.fields.is_empty() => &rb.fields,
        _ => return Vec::new(),
    };
    if body.iter().all(u8::is_ascii_whitespace) {
        return Vec::new();
    }

    let payload: Map<String, Value> = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => return vec![BodyIssue::invalid_json(json_kind(&other))],
        Err(err) => return vec![BodyIssue::invalid_json(err.to_string())],
    };

    let mut issues = Vec::new();
    for field in fields {
        match payload.get(&field.name) {
            None if field.required => issues.push(BodyIssue::missing(&field.name)),
            None => {}
            Some(value) => {
                if !kind_matches(&field.kind, value) {
                    issues.push(BodyIssue::mismatch(&field.name, &field.kind, value));
                }
            }
        }
    }

    for key in payload.keys() {
        if !is_declared(fields, key) {
            issues.push(BodyIssue::unknown(key));
        }
    }

    issues
}

fn is_declared(fields: &[ActionBodyField], key: &str) -> bool {
    fields.iter().any(|f| f.name == key)
}

/// Whether `value` has the JSON kind named by a declared type tag.
/// Unrecognized tags accept anything.
fn kind_matches(declared: &str, value: &Value) -> bool {
    match declared {
        "string" => value.is_string(),
        "integer" => is_integral(value),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        t if t == "array" || t.starts_with("array[") => value.is_array(),
        _ => true,
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
