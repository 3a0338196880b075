//! Deterministic timing for tests
//!
//! [`RecordingSleeper`] stands in for the tokio timer: it records every
//! requested duration and returns immediately, so a retry schedule can be
//! asserted without waiting for it. [`FixedJitter`] pins the jitter factor.
//!
//! # Examples
//!
//! ```
//! # tokio_test::block_on(async {
//! use std::time::Duration;
//!
//! use sellerlink_common::testing::RecordingSleeper;
//! use sellerlink_common::time::Sleeper;
//!
//! let sleeper = RecordingSleeper::new();
//! sleeper.sleep(Duration::from_secs(5)).await;
//!
//! assert_eq!(sleeper.recorded(), vec![Duration::from_secs(5)]);
//! assert_eq!(sleeper.total(), Duration::from_secs(5));
//! # });
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::resilience::JitterSource;
use crate::time::Sleeper;

/// Sleeper that records requested durations instead of waiting
///
/// Clones share the same log, so a clone can be handed to an executor
/// while the test keeps the original for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    log: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration requested so far, in order
    pub fn recorded(&self) -> Vec<Duration> {
        self.log.lock().clone()
    }

    /// Sum of all requested durations
    pub fn total(&self) -> Duration {
        self.log.lock().iter().sum()
    }

    /// Number of recorded sleeps
    pub fn count(&self) -> usize {
        self.log.lock().len()
    }

    /// Forget recorded sleeps
    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.log.lock().push(duration);
        tokio::task::yield_now().await;
    }
}

/// Jitter source that always returns the same factor, clamped to the
/// requested band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn factor(&self, low: f64, high: f64) -> f64 {
        self.0.clamp(low, high)
    }
}
