//! Canonical error kinds
//!
//! `ErrorKind` is the closed, vendor-agnostic vocabulary every failure is
//! normalized into before it leaves the adapter layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ErrorClassification, ErrorSeverity};

/// Canonical classification of a marketplace API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Credentials rejected or missing
    Unauthorized,
    /// Upstream throttling
    RateLimitExceeded,
    /// Account-level quota exhausted
    QuotaExceeded,
    /// Generic missing resource
    ResourceNotFound,
    /// Missing product
    ProductNotFound,
    /// Missing order
    OrderNotFound,
    /// Missing ASIN
    AsinNotFound,
    /// Missing SKU
    SkuNotFound,
    /// Input rejected by the vendor API
    InvalidInput,
    /// Request rejected at the HTTP layer (pure status-code route)
    InvalidRequest,
    /// Upstream temporarily unavailable
    ServiceUnavailable,
    /// Upstream internal failure
    InternalError,
    /// Module or connection could not be set up
    InitializationError,
    /// Module used before `initialize`
    NotInitialized,
    /// Operation exceeded its deadline
    OperationTimeout,
    /// Operation failed for a reason outside the vendor taxonomy
    OperationFailed,
    /// Nothing matched
    Unknown,
}

impl ErrorKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 17] = [
        Self::Unauthorized,
        Self::RateLimitExceeded,
        Self::QuotaExceeded,
        Self::ResourceNotFound,
        Self::ProductNotFound,
        Self::OrderNotFound,
        Self::AsinNotFound,
        Self::SkuNotFound,
        Self::InvalidInput,
        Self::InvalidRequest,
        Self::ServiceUnavailable,
        Self::InternalError,
        Self::InitializationError,
        Self::NotInitialized,
        Self::OperationTimeout,
        Self::OperationFailed,
        Self::Unknown,
    ];

    /// Stable code used in logs and serialized records
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::AsinNotFound => "ASIN_NOT_FOUND",
            Self::SkuNotFound => "SKU_NOT_FOUND",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::InitializationError => "INITIALIZATION_ERROR",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::OperationTimeout => "OPERATION_TIMEOUT",
            Self::OperationFailed => "OPERATION_FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether this kind is one of the not-found family
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound
                | Self::ProductNotFound
                | Self::OrderNotFound
                | Self::AsinNotFound
                | Self::SkuNotFound
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown error kind: {s}"))
    }
}

impl ErrorClassification for ErrorKind {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded
                | Self::QuotaExceeded
                | Self::ServiceUnavailable
                | Self::OperationTimeout
                | Self::InternalError
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            kind if kind.is_not_found() => ErrorSeverity::Info,
            Self::RateLimitExceeded
            | Self::QuotaExceeded
            | Self::ServiceUnavailable
            | Self::OperationTimeout
            | Self::Unauthorized => ErrorSeverity::Warning,
            Self::InternalError | Self::InitializationError | Self::NotInitialized => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    fn retry_after(&self) -> Option<std::time::Duration> {
        None
    }
}
