//! Normalized error record

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ErrorClassification, ErrorKind, ErrorSeverity};

/// Result alias for operations that fail with an [`ErrorRecord`]
pub type ErrorResult<T> = Result<T, ErrorRecord>;

/// A single normalized failure
///
/// Records are built once and never mutated afterwards: the builder methods
/// consume the record and return a new one, and every field is read through
/// an accessor.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("[{kind}] {message} ({context})")]
pub struct ErrorRecord {
    kind: ErrorKind,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    http_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vendor_code: Option<String>,
    context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    /// Create a record with an empty context
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
            vendor_code: None,
            context: String::new(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the `{module}.{operation}` context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Attach the HTTP status
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Attach the vendor error code
    pub fn with_vendor_code(mut self, code: impl Into<String>) -> Self {
        self.vendor_code = Some(code.into());
        self
    }

    /// Attach diagnostic details (usually the serialized raw error)
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Wrap this record under an outer context, keeping the original kind.
    ///
    /// The inner context is preserved in the message so the full call chain
    /// stays greppable.
    pub fn wrap(self, outer_context: impl Into<String>) -> Self {
        let outer_context = outer_context.into();
        let message = if self.context.is_empty() {
            self.message
        } else {
            format!("{}: {}", self.context, self.message)
        };
        Self { message, context: outer_context, ..self }
    }

    /// Canonical kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, when the failure came from a response
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Vendor error code, when one was reported
    pub fn vendor_code(&self) -> Option<&str> {
        self.vendor_code.as_deref()
    }

    /// `{module}.{operation}` where the error surfaced
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Serialized raw error or other structured detail
    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }

    /// When the record was created
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Convert to structured logging fields
    pub fn as_tracing_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("error_kind", self.kind.code().to_string()),
            ("message", self.message.clone()),
            ("context", self.context.clone()),
        ];
        if let Some(status) = self.http_status {
            fields.push(("http_status", status.to_string()));
        }
        if let Some(code) = &self.vendor_code {
            fields.push(("vendor_code", code.clone()));
        }
        fields
    }
}

impl ErrorClassification for ErrorRecord {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn severity(&self) -> ErrorSeverity {
        self.kind.severity()
    }

    fn is_critical(&self) -> bool {
        self.kind.is_critical()
    }

    fn retry_after(&self) -> Option<Duration> {
        self.kind.retry_after()
    }
}

/// Create a record directly from a message and kind.
///
/// Used where there is no upstream error to map, e.g. configuration
/// validation or module lifecycle failures.
pub fn create_error(
    message: impl Into<String>,
    kind: ErrorKind,
    details: Option<serde_json::Value>,
) -> ErrorRecord {
    let record = ErrorRecord::new(kind, message);
    match details {
        Some(details) => record.with_details(details),
        None => record,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Validates builder methods and accessors.
    ///
    /// Assertions:
    /// - Every attached field is readable through its accessor.
    /// - Display includes kind, message and context.
    #[test]
    fn test_record_builder_and_display() {
        let record = ErrorRecord::new(ErrorKind::SkuNotFound, "SKU ABC-1 not found")
            .with_context("listings.get_item")
            .with_http_status(404)
            .with_vendor_code("NotFound")
            .with_details(json!({"sku": "ABC-1"}));

        assert_eq!(record.kind(), ErrorKind::SkuNotFound);
        assert_eq!(record.http_status(), Some(404));
        assert_eq!(record.vendor_code(), Some("NotFound"));
        assert_eq!(record.context(), "listings.get_item");
        assert_eq!(record.details(), Some(&json!({"sku": "ABC-1"})));
        assert_eq!(
            record.to_string(),
            "[SKU_NOT_FOUND] SKU ABC-1 not found (listings.get_item)"
        );
    }

    /// Validates `create_error` with and without details.
    #[test]
    fn test_create_error() {
        let record = create_error("missing marketplace", ErrorKind::InitializationError, None);
        assert_eq!(record.kind(), ErrorKind::InitializationError);
        assert_eq!(record.context(), "");
        assert!(record.details().is_none());

        let record = create_error("boom", ErrorKind::OperationFailed, Some(json!({"n": 1})));
        assert_eq!(record.details(), Some(&json!({"n": 1})));
    }

    /// Validates wrapping keeps the kind and folds the inner context into
    /// the message.
    #[test]
    fn test_wrap_preserves_kind() {
        let inner = ErrorRecord::new(ErrorKind::RateLimitExceeded, "slow down")
            .with_context("vendors.get_purchase_orders");
        let wrapped = inner.wrap("batch.sync_orders");

        assert_eq!(wrapped.kind(), ErrorKind::RateLimitExceeded);
        assert_eq!(wrapped.context(), "batch.sync_orders");
        assert_eq!(wrapped.message(), "vendors.get_purchase_orders: slow down");
    }

    /// Validates serialization uses camelCase and skips empty options.
    #[test]
    fn test_serialization_shape() {
        let record = ErrorRecord::new(ErrorKind::Unknown, "x").with_context("m.op");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["kind"], "UNKNOWN");
        assert_eq!(value["context"], "m.op");
        assert!(value.get("httpStatus").is_none());
        assert!(value.get("timestamp").is_some());
    }

    /// Validates classification delegates to the kind.
    #[test]
    fn test_classification_delegates_to_kind() {
        let record = ErrorRecord::new(ErrorKind::ServiceUnavailable, "down");
        assert!(record.is_retryable());
        assert_eq!(record.severity(), ErrorSeverity::Warning);
        assert!(record.retry_after().is_none());
    }
}
