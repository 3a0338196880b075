//! Shared library tier for SellerLink marketplace adapters.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error taxonomy, raw error shapes and the mapper, serde
//!   helpers
//! - `observability`: tracing (pulled in by `runtime`)
//! - `runtime`: async resilience (backoff, retry, batch execution),
//!   pagination, injectable time
//! - `test-utils`: deterministic sleepers and jitter for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod pagination;
#[cfg(feature = "runtime")]
pub mod resilience;
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{
    create_error, map_http_error, map_to_error_kind, ErrorClassification, ErrorKind, ErrorRecord,
    ErrorResult, ErrorSeverity, RawError,
};
#[cfg(feature = "runtime")]
pub use pagination::{collect_all, collect_all_with_summary, Page, PaginationAggregator};
#[cfg(feature = "runtime")]
pub use resilience::{
    BatchConfig, BatchExecutor, BatchOptions, BatchOutcome, RetryCondition, RetryPolicy,
};
#[cfg(feature = "foundation")]
pub use utils::serde::{duration_millis, option_duration_millis};
