use alloy_primitives::ChainId;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::graphql::{GraphQlRequest, GraphQlResponse};

/// Diagnostic name used when the active chain has no subgraph
pub const UNSUPPORTED_NETWORK: &str = "UnsupportedNetwork";

/// Error part of a failed query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryError {
    pub name: String,
    pub message: String,
    pub stack: String,
}

/// Request/response context attached to a failure when the request was sent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<GraphQlRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<GraphQlResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFailure {
    pub error: QueryError,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<RequestMeta>,
}

impl QueryFailure {
    pub fn unsupported_network(chain_id: Option<ChainId>) -> Self {
        let chain = chain_id.map_or_else(|| "none".to_string(), |id| id.to_string());
        Self {
            error: QueryError {
                name: UNSUPPORTED_NETWORK.to_string(),
                message: format!("Subgraph queries against ChainId {chain} are not supported."),
                stack: String::new(),
            },
            meta: None,
        }
    }

    pub fn is_unsupported_network(&self) -> bool {
        self.error.name == UNSUPPORTED_NETWORK
    }
}

/// Result of a subgraph query
///
/// Serializes as `{"data": ...}` or `{"error": ..., "meta": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Success { data: Value },
    Failure(QueryFailure),
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            QueryOutcome::Success { data } => Some(data),
            QueryOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&QueryFailure> {
        match self {
            QueryOutcome::Success { .. } => None,
            QueryOutcome::Failure(failure) => Some(failure),
        }
    }

    /// Decode a successful payload into one of the typed subgraph models
    ///
    /// Returns `None` for failures.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<Result<T, serde_json::Error>> {
        self.data().map(|data| T::deserialize(data))
    }
}
