//! Stateless request builder and response parser for the BambooHR gateway.
//!
//! # Design
//! `BambooClient` holds only per-tenant configuration computed once at
//! construction: the company domain, the tenant-scoped base URL and the
//! base64 Basic credential. Building a request and parsing its response are
//! separate steps so the core stays free of I/O; `Gateway` (or a host over
//! FFI) performs the round trip in between.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoint::{BodyKind, Operation};
use crate::error::{ApiError, ArgumentError, RequestFailure};
use crate::http::{HttpRequest, HttpResponse};

/// Origin of the hosted gateway.
pub const DEFAULT_API_ROOT: &str = "https://api.bamboohr.com";

/// Immutable per-tenant client for the gateway.
#[derive(Clone)]
pub struct BambooClient {
    company_domain: String,
    base_url: String,
    credential: String,
}

impl BambooClient {
    /// Create a client for `company_domain` authenticating with `api_key`.
    ///
    /// The key is not checked here; a bad key only shows up as a failed
    /// request.
    pub fn new(company_domain: &str, api_key: &str) -> Self {
        Self {
            company_domain: company_domain.to_string(),
            base_url: tenant_base_url(DEFAULT_API_ROOT, company_domain),
            credential: STANDARD.encode(format!("{api_key}:")),
        }
    }

    /// Point the client at a different origin, e.g. a local mock gateway.
    pub fn with_api_root(mut self, api_root: &str) -> Self {
        self.base_url = tenant_base_url(api_root, &self.company_domain);
        self
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let client = Self::new(&config.company_domain, &config.api_key);
        match config.api_root.as_deref() {
            Some(root) => client.with_api_root(root),
            None => client,
        }
    }

    pub fn company_domain(&self) -> &str {
        &self.company_domain
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Value of the `Authorization` header sent with every request.
    pub fn authorization(&self) -> String {
        format!("Basic {}", self.credential)
    }

    /// Build the request for `operation` from named arguments.
    ///
    /// `args` names path parameters and optional query parameters as they
    /// appear in [`Endpoint`](crate::Endpoint). This is the table-driven entry
    /// point used by hosts; the generated `build_*` methods wrap it with typed
    /// signatures.
    pub fn build_request(
        &self,
        operation: Operation,
        args: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        let body = body.map(encode_body).transpose()?;
        self.assemble(operation, args, body)
    }

    pub(crate) fn assemble(
        &self,
        operation: Operation,
        args: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let endpoint = operation.endpoint();
        let invalid = |reason| ApiError::InvalidArguments {
            operation: operation.name(),
            reason,
        };

        match (endpoint.body, body.is_some()) {
            (BodyKind::Json, false) => return Err(invalid(ArgumentError::BodyRequired)),
            (BodyKind::Empty, true) => return Err(invalid(ArgumentError::BodyNotAccepted)),
            _ => {}
        }
        let suffix = endpoint.render(args).map_err(invalid)?;

        let mut headers = vec![
            ("Authorization".to_string(), self.authorization()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method: endpoint.method,
            url: format!("{}{suffix}", self.base_url),
            headers,
            body,
        })
    }

    /// Turn a gateway response into its JSON value.
    ///
    /// Non-2xx statuses and bodies that are not JSON (an empty body
    /// included) fail with [`ApiError::RequestFailed`].
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(RequestFailure::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }
        serde_json::from_str(&response.body)
            .map_err(|e| RequestFailure::Decode(e).into())
    }
}

impl std::fmt::Debug for BambooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BambooClient")
            .field("company_domain", &self.company_domain)
            .field("base_url", &self.base_url)
            .field("credential", &"<redacted>")
            .finish()
    }
}

fn tenant_base_url(api_root: &str, company_domain: &str) -> String {
    format!(
        "{}/api/gateway.php/{company_domain}/v1",
        api_root.trim_end_matches('/')
    )
}

pub(crate) fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| RequestFailure::Encode(e).into())
}
