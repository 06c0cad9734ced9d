//! C-ABI wrapper around `bamboohr-core`.
//!
//! # Overview
//! Exposes the gateway endpoint table through `extern "C"` functions so a
//! host scripting environment can build authenticated requests by operation
//! name, run the HTTP round trip itself, and hand the response back for
//! parsing.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One table-driven `bamboohr_build_request` covers every operation; hosts
//!   discover names with `bamboohr_operation_count` / `bamboohr_operation_name`.
//! - Arguments and bodies cross as JSON text, responses come back as JSON
//!   text inside a single `FfiResult` envelope.
//! - The host owns all returned pointers and must call the matching
//!   `bamboohr_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use bamboohr_core::{BambooClient, HttpResponse, Operation};
use serde_json::Value;

use types::*;

/// Borrow a C string as UTF-8. Returns `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn owned_c_string(s: &str) -> *mut c_char {
    CString::new(s).map(CString::into_raw).unwrap_or(std::ptr::null_mut())
}

/// Decode `{"name": "value" | number, ...}` into argument pairs.
fn parse_args(json: &str) -> Option<Vec<(String, String)>> {
    let Value::Object(map) = serde_json::from_str::<Value>(json).ok()? else {
        return None;
    };
    map.into_iter()
        .map(|(name, value)| match value {
            Value::String(s) => Some((name, s)),
            Value::Number(n) => Some((name, n.to_string())),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for `company_domain` authenticating with `api_key`.
///
/// Returns null if either argument is null or not valid UTF-8.
/// The caller must free the returned pointer with `bamboohr_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_client_new(
    company_domain: *const c_char,
    api_key: *const c_char,
) -> *mut FfiBambooClient {
    catch_unwind(|| {
        let (Some(domain), Some(key)) = (unsafe { read_str(company_domain) }, unsafe { read_str(api_key) }) else {
            return std::ptr::null_mut();
        };
        let client = BambooClient::new(domain, key);
        Box::into_raw(Box::new(FfiBambooClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Like `bamboohr_client_new`, but targeting `api_root` instead of the hosted
/// API origin.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_client_new_with_root(
    company_domain: *const c_char,
    api_key: *const c_char,
    api_root: *const c_char,
) -> *mut FfiBambooClient {
    catch_unwind(|| {
        let (Some(domain), Some(key), Some(root)) = (
            unsafe { read_str(company_domain) },
            unsafe { read_str(api_key) },
            unsafe { read_str(api_root) },
        ) else {
            return std::ptr::null_mut();
        };
        let client = BambooClient::new(domain, key).with_api_root(root);
        Box::into_raw(Box::new(FfiBambooClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `bamboohr_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_client_free(client: *mut FfiBambooClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// The client's tenant base URL. Free with `bamboohr_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_client_base_url(client: *const FfiBambooClient) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        owned_c_string(client.inner.base_url())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Operation discovery
// ---------------------------------------------------------------------------

/// Number of operations in the endpoint table.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_operation_count() -> u32 {
    catch_unwind(|| Operation::ALL.len() as u32).unwrap_or(0)
}

/// Name of the operation at `index`, or null when out of range.
/// Free with `bamboohr_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_operation_name(index: u32) -> *mut c_char {
    catch_unwind(|| match Operation::ALL.get(index as usize) {
        Some(op) => owned_c_string(op.name()),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Build / parse
// ---------------------------------------------------------------------------

/// Build the request for the operation named `operation`.
///
/// `args_json` is a JSON object mapping parameter names to strings or
/// numbers, or null when the operation takes none. `body_json` is the JSON
/// payload, or null for operations without a body.
///
/// Returns null if `client` or `operation` is null, the name is unknown,
/// either JSON argument is malformed, or the arguments do not fit the
/// endpoint. The caller must free the result with `bamboohr_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_build_request(
    client: *const FfiBambooClient,
    operation: *const c_char,
    args_json: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(operation) = unsafe { read_str(operation) }.and_then(|name| name.parse::<Operation>().ok()) else {
            return std::ptr::null_mut();
        };

        let args = if args_json.is_null() {
            Vec::new()
        } else {
            match unsafe { read_str(args_json) }.and_then(parse_args) {
                Some(args) => args,
                None => return std::ptr::null_mut(),
            }
        };
        let body = if body_json.is_null() {
            None
        } else {
            match unsafe { read_str(body_json) }.and_then(|text| serde_json::from_str::<Value>(text).ok()) {
                Some(value) => Some(value),
                None => return std::ptr::null_mut(),
            }
        };

        let borrowed: Vec<(&str, &str)> = args.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        match client.inner.build_request(operation, &borrowed, body.as_ref()) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the host's response to a request built by this library.
///
/// Non-2xx statuses and bodies that are not JSON produce `RequestFailed`.
/// A null `body` reads as empty. Invalid UTF-8 is replaced lossily, so it
/// fails JSON decoding like any other malformed body.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_parse_response(
    client: *const FfiBambooClient,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            String::new()
        } else {
            String::from_utf8_lossy(unsafe { CStr::from_ptr(resp.body) }.to_bytes()).into_owned()
        };
        let core_resp = HttpResponse {
            status: resp.status,
            headers: Vec::new(),
            body,
        };
        match client.inner.parse_response(core_resp) {
            Ok(value) => FfiResult::ok_json(&value),
            Err(e) => FfiResult::request_failed(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in bamboohr_parse_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `bamboohr_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiResult` returned by `bamboohr_parse_response`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.json.is_null() {
            drop(unsafe { CString::from_raw(result.json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn bamboohr_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
