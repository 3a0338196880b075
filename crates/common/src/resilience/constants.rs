// Constants for the resilience module
use std::time::Duration;

/// Default number of items per batch
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Default pause between sequential batch steps
pub const DEFAULT_DELAY_BETWEEN_BATCHES: Duration = Duration::from_millis(500);

/// Default number of batches in flight at once (1 = sequential)
pub const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 1;

/// Default maximum number of retries per batch
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry
pub const DEFAULT_INITIAL_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Default jitter ratio (0.4 = the 0.8..=1.2 band)
pub const DEFAULT_JITTER_RATIO: f64 = 0.4;

/// Maximum exponent for exponential backoff calculation to prevent overflow
pub const MAX_BACKOFF_EXPONENT: u32 = 30;

/// Default page cap for cursor pagination
pub const DEFAULT_MAX_PAGES: usize = 10;

/// Context attached to batches interrupted by cancellation
pub const CANCELLED_CONTEXT: &str = "batch_executor.cancelled";
