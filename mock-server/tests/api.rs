use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_log, new_log, RecordedRequest};
use serde_json::Value;
use tower::ServiceExt;

const AUTH: &str = "Basic c2VjcmV0MTIzOg==";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::ACCEPT, "application/json")
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn get_is_echoed() {
    let resp = app()
        .oneshot(authed("GET", "/api/gateway.php/acme/v1/employees/42/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Value = body_json(resp).await;
    assert_eq!(echo["method"], "GET");
    assert_eq!(echo["path"], "/api/gateway.php/acme/v1/employees/42/");
    assert_eq!(echo["company"], "acme");
    assert!(echo["body"].is_null());
}

#[tokio::test]
async fn json_body_is_echoed_parsed() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/gateway.php/acme/v1/employees/",
            r#"{"firstName":"Jane"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Value = body_json(resp).await;
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["body"]["firstName"], "Jane");
}

#[tokio::test]
async fn query_string_is_kept_in_path() {
    let resp = app()
        .oneshot(authed(
            "PUT",
            "/api/gateway.php/acme/v1/employees/42/time_off/calculator?end=2024-12-31",
        ))
        .await
        .unwrap();

    let echo: Value = body_json(resp).await;
    assert_eq!(
        echo["path"],
        "/api/gateway.php/acme/v1/employees/42/time_off/calculator?end=2024-12-31"
    );
}

// --- failure modes ---

#[tokio::test]
async fn missing_credential_is_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/gateway.php/acme/v1/meta/fields/")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_company_returns_non_json() {
    let resp = app()
        .oneshot(authed("GET", "/api/gateway.php/malformed/v1/meta/fields/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&body).is_err());
}

#[tokio::test]
async fn failing_company_returns_500() {
    let resp = app()
        .oneshot(authed("DELETE", "/api/gateway.php/failing/v1/files/9"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn empty_company_returns_empty_body() {
    let resp = app()
        .oneshot(authed("DELETE", "/api/gateway.php/empty/v1/webhooks/3/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

// --- request log ---

#[tokio::test]
async fn requests_are_recorded_in_order() {
    use tower::Service;

    let log = new_log();
    let mut app = app_with_log(log.clone()).into_service();

    for req in [
        authed("GET", "/api/gateway.php/acme/v1/employees/directory"),
        json_request("PUT", "/api/gateway.php/acme/v1/v1/employeedependents/9", r#"{"firstName":"Sam"}"#),
        Request::builder()
            .uri("/api/gateway.php/acme/v1/meta/users/")
            .body(String::new())
            .unwrap(),
    ] {
        ServiceExt::ready(&mut app).await.unwrap().call(req).await.unwrap();
    }

    let recorded = log.read().await.clone();
    assert_eq!(recorded.len(), 3);
    assert_eq!(recorded[0].path, "/api/gateway.php/acme/v1/employees/directory");
    assert_eq!(recorded[0].accept.as_deref(), Some("application/json"));
    assert_eq!(recorded[1].method, "PUT");
    assert_eq!(recorded[1].path, "/api/gateway.php/acme/v1/v1/employeedependents/9");
    assert_eq!(recorded[1].content_type.as_deref(), Some("application/json"));
    assert_eq!(recorded[1].body.as_deref(), Some(r#"{"firstName":"Sam"}"#));
    assert!(recorded[2].authorization.is_none());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(Request::builder().uri("/__requests").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Vec<RecordedRequest> = body_json(resp).await;
    assert_eq!(listed, recorded);
}
