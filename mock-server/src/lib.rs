//! In-process stand-in for the BambooHR gateway.
//!
//! Every request under `/api/gateway.php/{company}/...` is recorded and then
//! answered according to the company domain:
//! - `malformed`: 200 with a body that is not JSON,
//! - `failing`: 500,
//! - `empty`: 200 with an empty body,
//! - anything else: 200 echoing the request as JSON.
//!
//! Requests without a `Basic base64("<key>:")` credential get a 401.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

/// One request as the gateway saw it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query, exactly as received.
    pub path: String,
    pub company: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

pub type RequestLog = Arc<RwLock<Vec<RecordedRequest>>>;

pub fn new_log() -> RequestLog {
    Arc::new(RwLock::new(Vec::new()))
}

pub fn app() -> Router {
    app_with_log(new_log())
}

pub fn app_with_log(log: RequestLog) -> Router {
    Router::new()
        .route("/__requests", get(list_requests))
        .route("/api/gateway.php/{company}/{*rest}", any(gateway))
        .with_state(log)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_log(listener: TcpListener, log: RequestLog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_log(log)).await
}

async fn list_requests(State(log): State<RequestLog>) -> Json<Vec<RecordedRequest>> {
    Json(log.read().await.clone())
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Accepts `Basic <token>` where the token decodes to `<key>:`.
pub fn is_valid_credential(authorization: &str) -> bool {
    let Some(token) = authorization.strip_prefix("Basic ") else {
        return false;
    };
    match STANDARD.decode(token) {
        Ok(decoded) => decoded.len() > 1 && decoded.ends_with(b":"),
        Err(_) => false,
    }
}

async fn gateway(
    State(log): State<RequestLog>,
    Path((company, _rest)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        company: company.clone(),
        authorization: header_value(&headers, header::AUTHORIZATION),
        accept: header_value(&headers, header::ACCEPT),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        body: (!body.is_empty()).then(|| body.clone()),
    };
    info!(method = %method, path = %path, company = %company, "recorded gateway request");
    let authorized = recorded
        .authorization
        .as_deref()
        .is_some_and(is_valid_credential);
    log.write().await.push(recorded);

    if !authorized {
        warn!(path = %path, "rejecting request without a valid credential");
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"}))).into_response();
    }

    match company.as_str() {
        "malformed" => (StatusCode::OK, "not json").into_response(),
        "failing" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "internal"})),
        )
            .into_response(),
        "empty" => StatusCode::OK.into_response(),
        _ => {
            let echoed = if body.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&body).unwrap_or(Value::String(body))
            };
            Json(json!({
                "method": method.as_str(),
                "path": path,
                "company": company,
                "body": echoed,
            }))
            .into_response()
        }
    }
}
