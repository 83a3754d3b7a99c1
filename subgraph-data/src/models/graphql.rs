use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// GraphQL request body as sent over HTTP
///
/// Serialized as `{"query": ..., "variables": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    /// Query document text
    pub query: String,

    /// Variables bound to the document's `$` parameters
    pub variables: Value,
}

/// A single entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// GraphQL response as observed by the client
///
/// Combines the HTTP status and headers with whatever the body contained.
/// When the body was not a JSON object, its raw text lands in `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub status: u16,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlError>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Members of a GraphQL response body; unknown top-level keys are ignored
#[derive(Deserialize)]
struct ResponseBody {
    #[serde(default)]
    data: Option<Value>,

    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,

    #[serde(default)]
    extensions: Option<Value>,
}

impl GraphQlResponse {
    /// Decode an HTTP body; anything that is not a GraphQL JSON object is kept as text
    pub fn from_body(status: u16, headers: BTreeMap<String, String>, body: &str) -> Self {
        let parsed = match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value::<ResponseBody>(value).ok(),
            _ => None,
        };

        match parsed {
            Some(ResponseBody {
                data,
                errors,
                extensions,
            }) => GraphQlResponse {
                status,
                headers,
                data,
                errors,
                extensions,
                error: None,
            },
            None => GraphQlResponse {
                status,
                headers,
                error: Some(body.to_string()),
                ..Default::default()
            },
        }
    }

    /// True when the response can be handed to the caller as data
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.status)
            && self.errors.is_none()
            && self.error.is_none()
            && self.data.is_some()
    }

    /// First GraphQL error message, or a generic one naming the status code
    pub fn summary(&self) -> String {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|error| error.message.clone())
            .unwrap_or_else(|| format!("GraphQL Error (Code: {})", self.status))
    }
}
