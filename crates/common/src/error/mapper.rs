//! Mapping raw upstream errors onto [`ErrorKind`]
//!
//! Classification is heuristic: an upstream code string and message string
//! are lower-cased and scanned for well-known fragments, together with the
//! HTTP status. Signals can overlap (a 404 whose message mentions "quota"),
//! so the rules below are applied in a fixed order and the first match wins:
//!
//! | # | Signal | Kind |
//! |---|--------|------|
//! | 1 | `throttl`, `ratelimit`, `rate limit`, `429` | `RateLimitExceeded` |
//! | 2 | `quota` | `QuotaExceeded` |
//! | 3 | `auth`, `token`, `401` | `Unauthorized` |
//! | 4 | `not_found`, `not found`, `404` | `AsinNotFound` / `OrderNotFound` / `SkuNotFound` / `ProductNotFound` / `ResourceNotFound` |
//! | 5 | `invalid`, `400` | `InvalidInput` |
//! | 6 | `service`, `500`, `502`, `503` | `ServiceUnavailable` |
//! | 7 | `internal` | `InternalError` |
//! | 8 | nothing | `Unknown` |
//!
//! [`map_http_error`] adds two routes on top: a structured error list always
//! wins and is classified from its first entry, and a bare status code goes
//! through [`classify_status`], which reports a 400 as `InvalidRequest`
//! rather than `InvalidInput`. Callers already depend on that split, so it is
//! kept as is.

use super::{ErrorKind, ErrorRecord, RawError};

/// Signals the heuristic classifier looks at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorSignals<'a> {
    /// Upstream error code, if any
    pub code: Option<&'a str>,
    /// Human-readable upstream message
    pub message: Option<&'a str>,
    /// HTTP status of the response
    pub status: Option<u16>,
}

impl<'a> ErrorSignals<'a> {
    /// Empty signal set; classifies as `Unknown`
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upstream code
    pub fn code(mut self, code: &'a str) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the upstream message
    pub fn message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    /// Set the HTTP status
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Classify an API error from its code, message and status.
pub fn map_to_error_kind(signals: &ErrorSignals<'_>) -> ErrorKind {
    let code = signals.code.unwrap_or_default().to_lowercase();
    let message = signals.message.unwrap_or_default().to_lowercase();
    let status = signals.status;

    let contains = |fragment: &str| code.contains(fragment) || message.contains(fragment);
    let has_status = |wanted: u16| status == Some(wanted) || code == wanted.to_string();

    if contains("throttl") || contains("ratelimit") || contains("rate limit") || has_status(429)
    {
        return ErrorKind::RateLimitExceeded;
    }
    if contains("quota") {
        return ErrorKind::QuotaExceeded;
    }
    if contains("auth") || contains("token") || has_status(401) {
        return ErrorKind::Unauthorized;
    }
    if contains("not_found") || contains("not found") || has_status(404) {
        return refine_not_found(&message);
    }
    if contains("invalid") || has_status(400) {
        return ErrorKind::InvalidInput;
    }
    if contains("service") || has_status(503) || has_status(502) || has_status(500) {
        return ErrorKind::ServiceUnavailable;
    }
    if contains("internal") {
        return ErrorKind::InternalError;
    }
    ErrorKind::Unknown
}

fn refine_not_found(message: &str) -> ErrorKind {
    if message.contains("asin") {
        ErrorKind::AsinNotFound
    } else if message.contains("order") {
        ErrorKind::OrderNotFound
    } else if message.contains("sku") {
        ErrorKind::SkuNotFound
    } else if message.contains("product") {
        ErrorKind::ProductNotFound
    } else {
        ErrorKind::ResourceNotFound
    }
}

/// Classify a bare HTTP status with no usable body.
pub fn classify_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::InvalidRequest,
        401 | 403 => ErrorKind::Unauthorized,
        404 => ErrorKind::ResourceNotFound,
        429 => ErrorKind::RateLimitExceeded,
        500 | 502 | 503 => ErrorKind::ServiceUnavailable,
        504 => ErrorKind::OperationTimeout,
        501 | 505..=599 => ErrorKind::InternalError,
        _ => ErrorKind::Unknown,
    }
}

/// Map any raw upstream error into a normalized record.
///
/// A structured error list is classified from its first entry alone; the
/// HTTP status only decides when the list is empty. The record carries
/// `context`, the HTTP status and vendor code when the raw shape has them,
/// and the serialized raw error under `details`. This function never fails.
pub fn map_http_error(raw: &RawError, context: &str) -> ErrorRecord {
    let kind = match raw {
        RawError::Structured { entries, status } => match entries.first() {
            Some(entry) => {
                map_to_error_kind(&ErrorSignals::new().code(&entry.code).message(&entry.message))
            }
            None => status.map_or(ErrorKind::Unknown, classify_status),
        },
        RawError::HttpStatus { status, .. } => classify_status(*status),
        RawError::Api { code, message, status } => map_to_error_kind(&ErrorSignals {
            code: code.as_deref(),
            message: Some(message),
            status: *status,
        }),
        RawError::Transport { timed_out: true, .. } => ErrorKind::OperationTimeout,
        RawError::Transport { message, .. } => {
            map_to_error_kind(&ErrorSignals::new().message(message))
        }
    };

    let mut record = ErrorRecord::new(kind, raw.message()).with_context(context);
    if let Some(status) = raw.status() {
        record = record.with_http_status(status);
    }
    if let Some(code) = raw.vendor_code() {
        record = record.with_vendor_code(code);
    }
    match serde_json::to_value(raw) {
        Ok(details) => record.with_details(details),
        Err(_) => record,
    }
}
