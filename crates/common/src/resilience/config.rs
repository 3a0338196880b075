//! Batch execution configuration
//!
//! [`BatchConfig`] is the serializable form read from configuration files
//! and environment variables. Delays are expressed in milliseconds on the
//! wire (`delayBetweenBatchesMs`, `initialRetryDelayMs`, `maxDelayMs`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::backoff::RetryPolicy;
use super::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DELAY_BETWEEN_BATCHES, DEFAULT_INITIAL_RETRY_DELAY,
    DEFAULT_JITTER_RATIO, DEFAULT_MAX_CONCURRENT_BATCHES, DEFAULT_MAX_RETRIES,
};
use super::retry::RetryCondition;
use crate::error::{ErrorKind, ErrorRecord, ErrorResult};
use crate::utils::serde::{duration_millis, option_duration_millis};

/// Configuration for batch execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    /// Items per batch
    pub batch_size: usize,

    /// Pause between sequential steps (batches, or chunks when concurrent)
    #[serde(rename = "delayBetweenBatchesMs", with = "duration_millis")]
    pub delay_between_batches: Duration,

    /// Batches in flight at once (1 = sequential)
    pub max_concurrent_batches: usize,

    /// Keep going after a batch exhausts its retries
    pub continue_on_error: bool,

    /// Retries per batch after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    #[serde(rename = "initialRetryDelayMs", with = "duration_millis")]
    pub initial_retry_delay: Duration,

    /// Double the delay on each retry
    pub use_exponential_backoff: bool,

    /// Jitter ratio in `[0, 1]`
    pub jitter_ratio: f64,

    /// Optional ceiling on a single retry delay
    #[serde(
        rename = "maxDelayMs",
        with = "option_duration_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_retry_delay: Option<Duration>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delay_between_batches: DEFAULT_DELAY_BETWEEN_BATCHES,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
            continue_on_error: true,
            max_retries: DEFAULT_MAX_RETRIES,
            initial_retry_delay: DEFAULT_INITIAL_RETRY_DELAY,
            use_exponential_backoff: true,
            jitter_ratio: DEFAULT_JITTER_RATIO,
            max_retry_delay: None,
        }
    }
}

impl BatchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> ErrorResult<()> {
        if self.batch_size == 0 {
            return Err(invalid("batch_size must be greater than 0"));
        }
        if self.max_concurrent_batches == 0 {
            return Err(invalid("max_concurrent_batches must be greater than 0"));
        }
        self.retry_policy().map(|_| ())
    }

    /// Build the retry policy described by this configuration
    pub fn retry_policy(&self) -> ErrorResult<RetryPolicy> {
        let builder = RetryPolicy::builder()
            .max_retries(self.max_retries)
            .initial_delay(self.initial_retry_delay)
            .exponential_backoff(self.use_exponential_backoff)
            .jitter_ratio(self.jitter_ratio);
        let builder = match self.max_retry_delay {
            Some(ceiling) => builder.max_delay(ceiling),
            None => builder.no_max_delay(),
        };
        builder.build().map_err(|err| err.wrap("batch_config.validate"))
    }

    /// Scheduling options described by this configuration
    pub fn options(&self) -> BatchOptions {
        BatchOptions {
            delay_between_batches: self.delay_between_batches,
            max_concurrent_batches: self.max_concurrent_batches,
            continue_on_error: self.continue_on_error,
            retry_condition: RetryCondition::default(),
        }
    }
}

fn invalid(message: &str) -> ErrorRecord {
    ErrorRecord::new(ErrorKind::InitializationError, message).with_context("batch_config.validate")
}

/// Scheduling options for a [`BatchExecutor`](super::BatchExecutor)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    /// Pause between sequential steps
    pub delay_between_batches: Duration,
    /// Batches in flight at once
    pub max_concurrent_batches: usize,
    /// Keep going after a terminal failure
    pub continue_on_error: bool,
    /// Which failures are retried
    pub retry_condition: RetryCondition,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchConfig::default().options()
    }
}

impl BatchOptions {
    /// One batch at a time
    pub fn sequential() -> Self {
        Self { max_concurrent_batches: 1, ..Self::default() }
    }

    /// Up to `max_concurrent_batches` batches per chunk
    pub fn concurrent(max_concurrent_batches: usize) -> Self {
        Self { max_concurrent_batches, ..Self::default() }
    }

    /// Set the inter-batch delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between_batches = delay;
        self
    }

    /// Stop at the first terminal failure
    pub fn stop_on_error(mut self) -> Self {
        self.continue_on_error = false;
        self
    }

    /// Set the retry condition
    pub fn with_retry_condition(mut self, condition: RetryCondition) -> Self {
        self.retry_condition = condition;
        self
    }
}
