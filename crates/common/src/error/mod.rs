//! Canonical error taxonomy for marketplace API adapters
//!
//! Vendor APIs fail in many shapes: structured error lists, bare status
//! codes, ad-hoc code/message pairs, transport failures. This module
//! normalizes all of them into a single vocabulary so nothing outside the
//! adapter layer ever has to look at a raw vendor error.
//!
//! # Error Handling Architecture
//!
//! 1. **[`ErrorKind`]**: the closed set of canonical kinds.
//!
//! 2. **[`ErrorRecord`]**: an immutable failure record carrying the kind, a
//!    message, the `{module}.{operation}` context, optional HTTP status and
//!    vendor code, and the raw error as diagnostic details.
//!
//! 3. **[`RawError`]**: the upstream shapes the boundary client may return,
//!    and the mapper ([`map_http_error`], [`map_to_error_kind`]) that turns
//!    them into records.
//!
//! 4. **[`ErrorClassification`]**: retryability and severity, used by the
//!    batch executor's retry condition and by logging.
//!
//! ## Examples
//!
//! ```rust
//! use sellerlink_common::error::{map_http_error, ErrorKind, RawError};
//!
//! let raw = RawError::http_status(429, None);
//! let record = map_http_error(&raw, "vendors.get_purchase_orders");
//!
//! assert_eq!(record.kind(), ErrorKind::RateLimitExceeded);
//! assert_eq!(record.context(), "vendors.get_purchase_orders");
//! ```

use std::fmt;
use std::time::Duration;

pub mod kind;
pub mod mapper;
pub mod raw;
pub mod record;

pub use kind::ErrorKind;
pub use mapper::{classify_status, map_http_error, map_to_error_kind, ErrorSignals};
pub use raw::{RawError, VendorErrorEntry};
pub use record::{create_error, ErrorRecord, ErrorResult};

/// Error classification trait for consistent error handling across modules
///
/// This trait provides a standard interface for classifying errors by their
/// characteristics, enabling consistent retry logic, monitoring, and alerting.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as:
    /// - Throttling and quota windows
    /// - Temporary service unavailability
    /// - Timeouts
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for monitoring, alerting, and logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `Some(Duration)` when a specific delay is recommended, or
    /// `None` if the caller's backoff should decide.
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl From<serde_json::Error> for ErrorRecord {
    fn from(err: serde_json::Error) -> Self {
        ErrorRecord::new(ErrorKind::OperationFailed, format!("JSON error: {err}"))
            .with_context("serde_json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates `ErrorSeverity` ordering.
    ///
    /// Assertions:
    /// - Ensures `Info < Warning < Error < Critical`.
    #[test]
    fn test_error_severity_ordering() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    /// Validates `ErrorSeverity` display labels.
    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Info.to_string(), "INFO");
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Error.to_string(), "ERROR");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }

    /// Validates conversion from `serde_json::Error`.
    #[test]
    fn test_conversion_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let record: ErrorRecord = json_err.into();

        assert_eq!(record.kind(), ErrorKind::OperationFailed);
        assert!(record.message().starts_with("JSON error"));
    }
}
