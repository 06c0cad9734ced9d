//! Pluggable HTTP execution.
//!
//! # Design
//! The core never performs I/O on its own. `Transport` is the single seam
//! where an `HttpRequest` becomes an `HttpResponse`; the blocking
//! `UreqTransport` is the default, and any closure with the same shape works
//! too, which is how tests simulate network failures.
//!
//! Transports report only failures to complete the round trip. Status codes
//! are returned as data and interpreted by `BambooClient::parse_response`.

use crate::http::{HttpRequest, HttpResponse};

/// Error produced when a transport cannot complete a round trip.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Executes a request and returns the raw response.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use ureq::{Agent, RequestBuilder};

    use super::{Transport, TransportError};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a shared `ureq::Agent`.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        agent: Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }

        /// Use a preconfigured agent. It must not turn 4xx/5xx statuses into
        /// errors, or those responses surface as transport failures.
        pub fn with_agent(agent: Agent) -> Self {
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = request.url.as_str();
            let headers = request.headers.as_slice();

            let mut response = match (request.method, request.body.as_deref()) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call()?,
                (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call()?,
                (HttpMethod::Post, Some(body)) => {
                    with_headers(self.agent.post(url), headers).send(body.as_bytes())?
                }
                (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty()?,
                (HttpMethod::Put, Some(body)) => {
                    with_headers(self.agent.put(url), headers).send(body.as_bytes())?
                }
                (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty()?,
            };

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            let body = response.body_mut().read_to_string()?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn closures_act_as_transports() {
        let transport = |request: &HttpRequest| -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: format!("\"{}\"", request.method),
            })
        };
        let request = HttpRequest {
            method: HttpMethod::Put,
            url: "http://localhost/x".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let response = transport.execute(&request).unwrap();
        assert_eq!(response.body, "\"PUT\"");
    }
}
