//! Error bodies returned by the REST API

use serde::{Deserialize, Serialize};

use crate::value_objects::Optional;

/// Body of a failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestErrorModel {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
    /// Nested per-field validation errors
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub errors: Optional<serde_json::Value>,
}

impl RestErrorModel {
    /// Flatten nested field errors into `path: message` lines
    pub fn field_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if let Optional::Present(errors) = &self.errors {
            collect_field_messages(errors, String::new(), &mut messages);
        }
        messages
    }
}

fn collect_field_messages(value: &serde_json::Value, path: String, out: &mut Vec<String>) {
    let Some(object) = value.as_object() else {
        return;
    };

    if let Some(errors) = object.get("_errors").and_then(serde_json::Value::as_array) {
        for error in errors {
            if let Some(message) = error.get("message").and_then(serde_json::Value::as_str) {
                out.push(format!("{path}: {message}"));
            }
        }
    }

    for (key, nested) in object {
        if key == "_errors" {
            continue;
        }
        let nested_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };
        collect_field_messages(nested, nested_path, out);
    }
}

/// Body of a 429 response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitModel {
    #[serde(default)]
    pub message: String,
    /// Seconds to wait
    pub retry_after: f64,
    #[serde(default)]
    pub global: bool,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub code: Optional<u32>,
}
