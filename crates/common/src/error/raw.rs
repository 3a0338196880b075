//! Raw upstream error shapes
//!
//! Vendor APIs report failures in several incompatible ways. `RawError` is
//! the closed set of shapes the boundary client is allowed to surface; the
//! mapper turns each of them into an [`ErrorRecord`](super::ErrorRecord).

use std::fmt;

use serde::{Deserialize, Serialize};

/// One entry of a vendor's structured error list
///
/// SP-API style payloads look like
/// `{"errors": [{"code": "InvalidInput", "message": "...", "details": "..."}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorErrorEntry {
    /// Vendor error code, e.g. `InvalidInput`
    pub code: String,
    /// Vendor message
    #[serde(default)]
    pub message: String,
    /// Extra vendor detail text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl VendorErrorEntry {
    /// Entry without details
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into(), details: None }
    }

    /// Attach vendor detail text
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Heterogeneous upstream failure, as returned by the boundary client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RawError {
    /// Payload carried a structured error list
    Structured {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        entries: Vec<VendorErrorEntry>,
    },
    /// Non-success status without a structured body
    HttpStatus {
        status: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    /// Bare vendor error with an optional code
    Api {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
    /// Request never produced a response
    Transport { message: String, timed_out: bool },
}

impl RawError {
    /// Structured error list with an optional status
    pub fn structured(status: Option<u16>, entries: Vec<VendorErrorEntry>) -> Self {
        Self::Structured { status, entries }
    }

    /// Bare non-success status
    pub fn http_status(status: u16, body: Option<String>) -> Self {
        Self::HttpStatus { status, body }
    }

    /// Vendor error outside a structured list
    pub fn api(code: Option<&str>, message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Api { code: code.map(str::to_string), message: message.into(), status }
    }

    /// Transport failure before any response arrived
    pub fn transport(message: impl Into<String>, timed_out: bool) -> Self {
        Self::Transport { message: message.into(), timed_out }
    }

    /// Build a raw error from a non-success response body.
    ///
    /// A body shaped like `{"errors": [...]}` with at least one entry becomes
    /// [`RawError::Structured`]; anything else is kept as text under
    /// [`RawError::HttpStatus`].
    pub fn from_response(status: u16, body: &serde_json::Value) -> Self {
        let entries = body
            .get("errors")
            .cloned()
            .and_then(|errors| serde_json::from_value::<Vec<VendorErrorEntry>>(errors).ok())
            .unwrap_or_default();

        if entries.is_empty() {
            let body = match body {
                serde_json::Value::Null => None,
                serde_json::Value::String(text) => Some(text.clone()),
                other => Some(other.to_string()),
            };
            Self::HttpStatus { status, body }
        } else {
            Self::Structured { status: Some(status), entries }
        }
    }

    /// HTTP status, when the shape carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Structured { status, .. } | Self::Api { status, .. } => *status,
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Vendor error code, when the shape carries one
    pub fn vendor_code(&self) -> Option<&str> {
        match self {
            Self::Structured { entries, .. } => entries.first().map(|e| e.code.as_str()),
            Self::Api { code, .. } => code.as_deref(),
            Self::HttpStatus { .. } | Self::Transport { .. } => None,
        }
    }

    /// Best human-readable message for this shape
    pub fn message(&self) -> String {
        match self {
            Self::Structured { entries, status } => match entries.first() {
                Some(entry) if !entry.message.is_empty() => entry.message.clone(),
                Some(entry) => entry.code.clone(),
                None => status
                    .map_or_else(|| "empty error list".to_string(), |s| format!("HTTP {s}")),
            },
            Self::HttpStatus { status, body } => match body {
                Some(body) if !body.is_empty() => format!("HTTP {status}: {body}"),
                _ => format!("HTTP {status}"),
            },
            Self::Api { message, .. } | Self::Transport { message, .. } => message.clone(),
        }
    }
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vendor_code() {
            Some(code) => write!(f, "{code}: {}", self.message()),
            None => f.write_str(&self.message()),
        }
    }
}

impl std::error::Error for RawError {}
