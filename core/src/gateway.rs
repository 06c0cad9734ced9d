//! Authenticated request dispatcher.
//!
//! `Gateway` pairs a `BambooClient` with a `Transport`: build, execute,
//! parse. Each call is one independent round trip with no retries and no
//! caching. The typed per-operation callers are generated next to the
//! endpoint table.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::BambooClient;
use crate::endpoint::Operation;
use crate::error::{ApiError, RequestFailure};
use crate::http::HttpRequest;
use crate::transport::Transport;

#[cfg(feature = "ureq")]
use crate::config::ClientConfig;
#[cfg(feature = "ureq")]
use crate::transport::UreqTransport;

#[derive(Debug, Clone)]
pub struct Gateway<T> {
    client: BambooClient,
    transport: T,
}

impl<T: Transport> Gateway<T> {
    pub fn new(client: BambooClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BambooClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform `operation` with named arguments and an optional JSON body.
    pub fn call(
        &self,
        operation: Operation,
        args: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let request = self.client.build_request(operation, args, body)?;
        self.send(operation, request)
    }

    /// Execute an already-built request and parse its response.
    pub fn send(&self, operation: Operation, request: HttpRequest) -> Result<Value, ApiError> {
        debug!(
            operation = operation.name(),
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "dispatching gateway request"
        );

        let response = self.transport.execute(&request).map_err(|e| {
            warn!(operation = operation.name(), error = %e, "gateway transport failed");
            ApiError::from(RequestFailure::Transport(e))
        })?;

        let status = response.status;
        self.client.parse_response(response).inspect_err(|err| {
            warn!(operation = operation.name(), status, error = %err, "gateway request failed");
        })
    }
}

#[cfg(feature = "ureq")]
impl Gateway<UreqTransport> {
    /// Blocking gateway for `company_domain` over the hosted API.
    pub fn connect(company_domain: &str, api_key: &str) -> Self {
        Self::new(BambooClient::new(company_domain, api_key), UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(BambooClient::from_config(config), UreqTransport::new())
    }
}
