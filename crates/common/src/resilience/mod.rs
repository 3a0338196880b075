//! Resilience patterns for marketplace API calls
//!
//! - **[`backoff`]**: retry policy and jittered exponential delays
//! - **[`retry`]**: whole-operation retry with a cancellable backoff loop
//! - **[`batch`]**: batch splitting, bounded concurrency and
//!   continue-on-error aggregation built on the retry executor
//! - **[`config`]**: serializable batch configuration
//!
//! Sleeping and randomness are injected ([`Sleeper`](crate::time::Sleeper),
//! [`JitterSource`]) so every timing decision can be asserted in tests.

pub mod backoff;
pub mod batch;
pub mod config;
pub mod constants;
pub mod retry;

pub use backoff::{
    next_delay, BackoffCalculator, JitterSource, NoJitter, RetryPolicy, RetryPolicyBuilder,
    SeededJitter, ThreadRngJitter,
};
pub use batch::{split_into_batches, Batch, BatchError, BatchExecutor, BatchOutcome};
pub use config::{BatchConfig, BatchOptions};
pub use retry::{RetryCondition, RetryExecutor, RetryFailure, RetryOutcome};
