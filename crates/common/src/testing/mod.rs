//! Testing utilities and helpers
//!
//! - **[`assertions`]**: assertions for error kinds, delay bands and batch
//!   coverage
//! - **[`time`]**: deterministic sleeping and jitter
//!
//! ## Usage
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use std::time::Duration;
//!
//! use sellerlink_common::resilience::{BatchExecutor, BatchOptions, RetryPolicy};
//! use sellerlink_common::testing::{NoJitter, RecordingSleeper};
//!
//! let sleeper = RecordingSleeper::new();
//! let executor = BatchExecutor::new(10, RetryPolicy::default(), BatchOptions::default())
//!     .unwrap()
//!     .with_jitter(NoJitter)
//!     .with_sleeper(sleeper.clone());
//!
//! let outcome = executor
//!     .run((0..25).collect::<Vec<u32>>(), |batch| async move {
//!         Ok::<_, sellerlink_common::error::ErrorRecord>(batch.items().len())
//!     })
//!     .await;
//!
//! assert_eq!(outcome.results, vec![10, 10, 5]);
//! assert_eq!(sleeper.recorded(), vec![Duration::from_millis(500); 2]);
//! # });
//! ```

pub mod assertions;
pub mod time;

pub use assertions::{assert_batches_cover, assert_delay_within_band};
pub use time::{FixedJitter, RecordingSleeper};

pub use crate::resilience::{NoJitter, SeededJitter};
