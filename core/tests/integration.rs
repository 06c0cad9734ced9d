//! Drive the blocking gateway against a live mock server.
//!
//! The mock server runs on a random port in a background thread and records
//! every request it receives, so tests can check what went over the wire.

use bamboohr_core::{ApiError, BambooClient, Gateway, RequestFailure, UreqTransport};
use mock_server::{RecordedRequest, RequestLog};
use serde_json::json;

/// Start the mock gateway and return its origin plus the request log.
fn start_mock() -> (String, RequestLog) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let log = mock_server::new_log();
    let server_log = log.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_log(listener, server_log).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), log)
}

fn recorded(log: &RequestLog) -> Vec<RecordedRequest> {
    log.blocking_read().clone()
}

fn gateway(root: &str, company: &str) -> Gateway<UreqTransport> {
    let client = BambooClient::new(company, "secret123").with_api_root(root);
    Gateway::new(client, UreqTransport::new())
}

#[test]
fn requests_go_over_the_wire_as_built() {
    let (root, log) = start_mock();
    let gw = gateway(&root, "ACME");

    let echo = gw.get_employee("42", None).unwrap();
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["path"], "/api/gateway.php/ACME/v1/employees/42/");

    let echo = gw.add_employee(&json!({"firstName": "Jane"})).unwrap();
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["body"], json!({"firstName": "Jane"}));

    let echo = gw.update_employee_dependent("9", &json!({"relationship": "child"})).unwrap();
    assert_eq!(echo["method"], "PUT");
    assert_eq!(echo["path"], "/api/gateway.php/ACME/v1/v1/employeedependents/9");

    let echo = gw.get_goals_aggregate("42").unwrap();
    assert_eq!(echo["method"], "PUT");

    let echo = gw.delete_webhook("21").unwrap();
    assert_eq!(echo["method"], "DELETE");

    let log = recorded(&log);
    assert_eq!(log.len(), 5);
    assert_eq!(log[0].authorization.as_deref(), Some("Basic c2VjcmV0MTIzOg=="));
    assert_eq!(log[0].accept.as_deref(), Some("application/json"));
    assert!(log[0].content_type.is_none());
    assert!(log[0].body.is_none());
    assert_eq!(log[1].content_type.as_deref(), Some("application/json"));
    assert_eq!(log[1].body.as_deref(), Some(r#"{"firstName":"Jane"}"#));
}

#[test]
fn repeated_reads_are_independent_requests() {
    let (root, log) = start_mock();
    let gw = gateway(&root, "ACME");

    let first = gw.get_time_off_requests("2024-06-01", "2024-06-30", Some("approved"), None).unwrap();
    let second = gw.get_time_off_requests("2024-06-01", "2024-06-30", Some("approved"), None).unwrap();
    assert_eq!(first, second);

    let log = recorded(&log);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], log[1]);
    assert_eq!(
        log[0].path,
        "/api/gateway.php/ACME/v1/time_off/requests/?start=2024-06-01&end=2024-06-30&status=approved"
    );
}

#[test]
fn table_driven_calls_match_typed_calls() {
    let (root, log) = start_mock();
    let gw = gateway(&root, "ACME");

    gw.get_employee_table("42", "jobInfo").unwrap();
    gw.call(
        "get_employee_table".parse().unwrap(),
        &[("employee_id", "42"), ("table", "jobInfo")],
        None,
    )
    .unwrap();

    let log = recorded(&log);
    assert_eq!(log[0], log[1]);
}

#[test]
fn error_status_is_a_request_failure() {
    let (root, _log) = start_mock();

    let err = gateway(&root, "failing").list_webhooks().unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed(RequestFailure::Status { status: 500, .. })));
    assert!(err.to_string().starts_with("API request failed"));
}

#[test]
fn rejected_credential_is_a_request_failure() {
    let (root, _log) = start_mock();
    let client = BambooClient::new("ACME", "").with_api_root(&root);
    let gw = Gateway::new(client, UreqTransport::new());

    let err = gw.get_fields().unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(matches!(err, ApiError::RequestFailed(_)));
}

#[test]
fn malformed_body_is_a_request_failure() {
    let (root, _log) = start_mock();

    let err = gateway(&root, "malformed").get_users().unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed(RequestFailure::Decode(_))));
}

#[test]
fn empty_body_is_a_request_failure() {
    let (root, _log) = start_mock();

    let err = gateway(&root, "empty").delete_training_record("12").unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed(RequestFailure::Decode(_))));
    assert_eq!(err.status(), None);
}

#[test]
fn unreachable_gateway_is_a_request_failure() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let gw = gateway(&format!("http://127.0.0.1:{port}"), "ACME");

    let err = gw.get_employee_directory().unwrap_err();
    assert!(matches!(err, ApiError::RequestFailed(RequestFailure::Transport(_))));
}
