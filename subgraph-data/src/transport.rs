use std::backtrace::Backtrace;
use std::collections::BTreeMap;

use async_trait::async_trait;
use eyre::Result;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::models::graphql::{GraphQlRequest, GraphQlResponse};

/// Name of errors built from a GraphQL/HTTP response
pub const CLIENT_ERROR: &str = "ClientError";

/// Name of errors raised while the request or response was in flight
pub const TRANSPORT_ERROR: &str = "TransportError";

/// Structured failure reported by a [`GraphQlTransport`]
///
/// Transports return it inside an `eyre::Report`; the dispatcher recognizes it
/// by downcasting and turns it into a failed outcome. Anything else a
/// transport returns is treated as a fault and propagated.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ClientError {
    pub name: String,
    pub message: String,
    pub stack: String,
    pub request: GraphQlRequest,
    pub response: Option<GraphQlResponse>,
}

impl ClientError {
    /// Error for a response that carried GraphQL errors or no usable data
    pub fn from_response(request: GraphQlRequest, response: GraphQlResponse) -> Self {
        let context = json!({ "response": &response, "request": &request });
        Self {
            name: CLIENT_ERROR.to_string(),
            message: format!("{}: {}", response.summary(), context),
            stack: Backtrace::capture().to_string(),
            request,
            response: Some(response),
        }
    }

    /// Error for a request that never produced a readable response
    pub fn from_transport(request: GraphQlRequest, error: &dyn std::error::Error) -> Self {
        let mut stack = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name: TRANSPORT_ERROR.to_string(),
            message: error.to_string(),
            stack: stack.join("\n"),
            request,
            response: None,
        }
    }
}

/// Sends one GraphQL request to a subgraph URL
///
/// Returns the `data` member of the response on success.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn request(&self, url: &str, request: &GraphQlRequest) -> Result<Value>;
}

/// GraphQL-over-HTTP transport backed by `reqwest`
///
/// No timeout is configured; callers that need one wrap the call.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn request(&self, url: &str, request: &GraphQlRequest) -> Result<Value> {
        // A malformed URL or body is a programming error, not a client failure
        let http_request = self.client.post(url).json(request).build()?;

        let http_response = match self.client.execute(http_request).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Subgraph request to {} failed in transit: {}", url, e);
                return Err(ClientError::from_transport(request.clone(), &e).into());
            }
        };

        let status = http_response.status().as_u16();
        let headers: BTreeMap<String, String> = http_response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let body = match http_response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Reading subgraph response from {} failed: {}", url, e);
                return Err(ClientError::from_transport(request.clone(), &e).into());
            }
        };

        let response = GraphQlResponse::from_body(status, headers, &body);
        if !response.is_successful() {
            debug!("Subgraph at {} answered with status {} and no usable data", url, status);
            return Err(ClientError::from_response(request.clone(), response).into());
        }

        Ok(response.data.unwrap_or(Value::Null))
    }
}
