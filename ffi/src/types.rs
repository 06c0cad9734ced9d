//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use bamboohr_core::{ApiError, HttpMethod, HttpRequest};
use serde_json::Value;

/// Opaque handle to a `BambooClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiBambooClient {
    pub(crate) inner: bamboohr_core::BambooClient,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A gateway request described as C-compatible plain data.
///
/// Built by `bamboohr_build_request`. The host executes the request and
/// passes the response back through `bamboohr_parse_response`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    /// JSON text, or null when the request has no body.
    pub body: *mut c_char,
}

/// Convert to a C string, dropping the request if it contains a NUL byte.
fn c_string(s: String) -> Option<*mut c_char> {
    CString::new(s).ok().map(CString::into_raw)
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns null if any component contains an interior NUL byte.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        if req.url.contains('\0')
            || req.body.as_deref().is_some_and(|b| b.contains('\0'))
            || req.headers.iter().any(|(k, v)| k.contains('\0') || v.contains('\0'))
        {
            return std::ptr::null_mut();
        }

        let url = c_string(req.url).unwrap_or(std::ptr::null_mut());
        let body = req.body.and_then(c_string).unwrap_or(std::ptr::null_mut());

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k).unwrap_or(std::ptr::null_mut()),
                    value: c_string(v).unwrap_or(std::ptr::null_mut()),
                })
                .collect();
            // Boxed slice so capacity == len when the host hands it back.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// A gateway response described as C-compatible plain data.
///
/// The host constructs this after executing an `FfiHttpRequest`, then passes
/// a pointer to `bamboohr_parse_response`. The FFI layer reads but does not
/// free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    RequestFailed = 1,
    NullArg = 2,
    Panic = 3,
}

/// Result envelope for `bamboohr_parse_response`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `json`
/// holds the response re-serialized as JSON text.
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `json` is null. `http_status` is set when the
/// gateway answered with a non-2xx status.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

impl FfiResult {
    fn boxed(error_code: FfiErrorCode, message: Option<String>, http_status: u16, json: Option<String>) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: message
                .map(|m| CString::new(m.replace('\0', "")).unwrap_or_default().into_raw())
                .unwrap_or(std::ptr::null_mut()),
            http_status,
            json: json.and_then(c_string).unwrap_or(std::ptr::null_mut()),
        }))
    }

    /// Build a success result carrying the parsed JSON value.
    pub(crate) fn ok_json(value: &Value) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, None, 0, Some(value.to_string()))
    }

    /// Build an error result from a failed parse. Argument errors never get
    /// this far; `bamboohr_build_request` reports them as a null request.
    pub(crate) fn request_failed(err: ApiError) -> *mut Self {
        Self::boxed(
            FfiErrorCode::RequestFailed,
            Some(err.to_string()),
            err.status().unwrap_or(0),
            None,
        )
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::NullArg, Some(format!("null argument: {name}")), 0, None)
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), 0, None)
    }
}
