//! Synchronous client core for the BambooHR gateway API.
//!
//! # Overview
//! Every gateway endpoint is a row in a declarative table: verb, path
//! template, body kind. `BambooClient` turns a row plus arguments into an
//! `HttpRequest` and turns an `HttpResponse` back into a `serde_json::Value`
//! without touching the network (host-does-IO pattern). `Gateway` adds a
//! `Transport` to run the round trip in-process.
//!
//! # Design
//! - `BambooClient` is immutable: company domain, base URL and the Basic
//!   credential (`base64("<api_key>:")`) are fixed at construction.
//! - Responses are untyped JSON; no schema is enforced.
//! - Every dispatch failure is `ApiError::RequestFailed`, whatever the cause.
//! - Types use owned `String` / `Vec` fields so they map onto the C ABI in
//!   the `bamboohr-ffi` crate.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod gateway;
pub mod http;
pub mod transport;

pub use client::{BambooClient, DEFAULT_API_ROOT};
pub use config::{ClientConfig, ConfigError};
pub use endpoint::{BodyKind, Endpoint, Operation, UnknownOperation};
pub use error::{ApiError, ArgumentError, RequestFailure};
pub use gateway::Gateway;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, TransportError};

#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
