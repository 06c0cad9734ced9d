//! Verify request construction against `test-vectors/endpoints.json`.
//!
//! Each case names an operation, its arguments and body, and the request the
//! client must produce. Bodies are compared as parsed JSON; method, path and
//! headers are compared exactly.

use std::collections::HashSet;

use bamboohr_core::{BambooClient, HttpMethod, Operation};
use serde_json::Value;

fn vectors() -> Value {
    let raw = include_str!("../../test-vectors/endpoints.json");
    serde_json::from_str(raw).unwrap()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn client(vectors: &Value) -> BambooClient {
    BambooClient::new(
        vectors["company_domain"].as_str().unwrap(),
        vectors["api_key"].as_str().unwrap(),
    )
}

#[test]
fn client_matches_vector_header() {
    let v = vectors();
    let c = client(&v);
    assert_eq!(c.base_url(), v["base_url"].as_str().unwrap());
    assert_eq!(c.authorization(), v["authorization"].as_str().unwrap());
}

#[test]
fn endpoint_test_vectors() {
    let v = vectors();
    let c = client(&v);
    let base_url = v["base_url"].as_str().unwrap();

    for case in v["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation: Operation = case["operation"].as_str().unwrap().parse().unwrap();
        let args: Vec<(&str, &str)> = case["args"]
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str().unwrap()))
            .collect();
        let body = Some(&case["body"]).filter(|b| !b.is_null());
        let expected = &case["expected_request"];

        let req = c.build_request(operation, &args, body).unwrap();
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: url");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let pair = h.as_array().unwrap();
                (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match req.body.as_deref() {
            Some(text) => {
                let sent: Value = serde_json::from_str(text).unwrap();
                assert_eq!(sent, expected["body"], "{name}: body");
            }
            None => assert!(expected["body"].is_null(), "{name}: body should be absent"),
        }
    }
}

#[test]
fn every_operation_has_a_vector() {
    let v = vectors();
    let covered: HashSet<&str> = v["cases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|case| case["operation"].as_str().unwrap())
        .collect();

    for op in Operation::ALL {
        assert!(covered.contains(op.name()), "no vector for {op}");
    }
}

#[test]
fn documented_examples() {
    let c = BambooClient::new("ACME", "secret123");

    let req = c.build_get_employee("42", None).unwrap();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url, "https://api.bamboohr.com/api/gateway.php/ACME/v1/employees/42/");
    assert_eq!(req.header("Authorization"), Some("Basic c2VjcmV0MTIzOg=="));
    assert!(req.body.is_none());

    let body: Value = serde_json::from_str(r#"{"firstName":"Jane"}"#).unwrap();
    let req = c.build_add_employee(&body).unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.url, "https://api.bamboohr.com/api/gateway.php/ACME/v1/employees/");
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.body.as_deref(), Some(r#"{"firstName":"Jane"}"#));
}
