//! Batch execution with retry, bounded concurrency and continue-on-error
//!
//! [`BatchExecutor`] splits a working set into contiguous batches and feeds
//! each batch to a caller-supplied unit of work. A failed batch is retried
//! as a whole under the executor's [`RetryPolicy`], so units of work must be
//! safe to re-run in full.
//!
//! # Scheduling
//!
//! Batches are grouped into chunks of `max_concurrent_batches`. Batches in a
//! chunk run concurrently as futures polled by the calling task, and chunks
//! run one after another with `delay_between_batches` between them (never
//! after the last one). With the default chunk size of 1 this is plain
//! sequential execution.
//!
//! # Ordering
//!
//! Sequential runs report `results` in batch order. Concurrent runs report
//! them in completion order; only [`BatchError::batch_index`] identifies a
//! failed batch.
//!
//! # Example
//!
//! ```rust
//! # tokio_test::block_on(async {
//! use std::time::Duration;
//!
//! use sellerlink_common::resilience::{BatchExecutor, BatchOptions, RetryPolicy};
//!
//! let options = BatchOptions::sequential().with_delay(Duration::ZERO);
//! let executor = BatchExecutor::new(2, RetryPolicy::default(), options).unwrap();
//!
//! let outcome = executor
//!     .run(vec![1, 2, 3, 4, 5], |batch| async move {
//!         Ok::<_, sellerlink_common::error::ErrorRecord>(batch.items().iter().sum::<i32>())
//!     })
//!     .await;
//!
//! assert_eq!(outcome.results, vec![3, 7, 5]);
//! assert!(outcome.is_complete());
//! # });
//! ```

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::backoff::{JitterSource, RetryPolicy, ThreadRngJitter};
use super::config::{BatchConfig, BatchOptions};
use super::retry::{RetryExecutor, RetryFailure};
use crate::error::{ErrorKind, ErrorRecord, ErrorResult};
use crate::time::{sleep_or_cancel, Sleeper, TokioSleeper};

/// One batch as handed to the unit of work
#[derive(Debug, Clone)]
pub struct Batch<T> {
    index: usize,
    attempt: u32,
    items: Vec<T>,
    cancel: CancellationToken,
}

impl<T> Batch<T> {
    /// Position of this batch in the run (0-based)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Retry attempt (0 on the first try)
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Items in this batch
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Token of the surrounding run, for units of work that want to stop
    /// early themselves
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the surrounding run was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Terminal failure of one batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchError {
    /// Position of the failed batch in the run
    pub batch_index: usize,
    /// Error of the last attempt
    pub error: ErrorRecord,
    /// Times the unit of work was invoked for this batch
    pub attempts: u32,
}

/// Aggregated result of a batch run
///
/// `results.len() + errors.len() == attempted_batches` always holds: each
/// attempted batch contributes exactly one entry to one of the two lists.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<R> {
    /// Successful results, in batch order when sequential and completion
    /// order when concurrent
    pub results: Vec<R>,
    /// Terminal batch failures
    pub errors: Vec<BatchError>,
    /// Batches the input was split into
    pub total_batches: usize,
    /// Batches the executor started
    pub attempted_batches: usize,
    /// A terminal failure stopped the run (`continue_on_error = false`)
    pub stopped_early: bool,
    /// The run was cancelled
    pub cancelled: bool,
}

impl<R> BatchOutcome<R> {
    fn new(total_batches: usize) -> Self {
        Self {
            results: Vec::new(),
            errors: Vec::new(),
            total_batches,
            attempted_batches: 0,
            stopped_early: false,
            cancelled: false,
        }
    }

    /// Every batch was attempted and none failed
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.attempted_batches == self.total_batches
    }

    /// Indices of the failed batches
    pub fn failed_batches(&self) -> impl Iterator<Item = usize> + '_ {
        self.errors.iter().map(|error| error.batch_index)
    }
}

/// Split `items` into contiguous batches of at most `batch_size` items.
///
/// Order is preserved and every item lands in exactly one batch. A zero
/// batch size is treated as 1.
pub fn split_into_batches<T>(items: Vec<T>, batch_size: usize) -> Vec<Vec<T>> {
    let size = batch_size.max(1);
    let mut batches = Vec::with_capacity(items.len().div_ceil(size));
    let mut remaining = items.into_iter();
    loop {
        let batch: Vec<T> = remaining.by_ref().take(size).collect();
        if batch.is_empty() {
            break;
        }
        batches.push(batch);
    }
    batches
}

struct BatchReport<R> {
    index: usize,
    attempts: u32,
    result: Result<R, RetryFailure>,
}

/// Executes work items in retried, optionally concurrent batches
#[derive(Debug, Clone)]
pub struct BatchExecutor<J = ThreadRngJitter, S = TokioSleeper> {
    batch_size: usize,
    options: BatchOptions,
    retry: RetryExecutor<J, S>,
}

impl BatchExecutor {
    /// Create an executor with thread-RNG jitter and tokio sleeping
    pub fn new(batch_size: usize, policy: RetryPolicy, options: BatchOptions) -> ErrorResult<Self> {
        if batch_size == 0 {
            return Err(invalid("batch_size must be greater than 0"));
        }
        if options.max_concurrent_batches == 0 {
            return Err(invalid("max_concurrent_batches must be greater than 0"));
        }
        policy.validate()?;

        let retry = RetryExecutor::new(policy).with_condition(options.retry_condition);
        Ok(Self { batch_size, options, retry })
    }

    /// Executor configured from a validated [`BatchConfig`]
    pub fn from_config(config: &BatchConfig) -> ErrorResult<Self> {
        config.validate()?;
        Self::new(config.batch_size, config.retry_policy()?, config.options())
    }
}

fn invalid(message: &str) -> ErrorRecord {
    ErrorRecord::new(ErrorKind::InitializationError, message).with_context("batch_executor.new")
}

impl<J, S> BatchExecutor<J, S> {
    /// Replace the jitter source
    pub fn with_jitter<J2: JitterSource>(self, jitter: J2) -> BatchExecutor<J2, S> {
        BatchExecutor {
            batch_size: self.batch_size,
            options: self.options,
            retry: self.retry.with_jitter(jitter),
        }
    }

    /// Replace the sleeper
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> BatchExecutor<J, S2> {
        BatchExecutor {
            batch_size: self.batch_size,
            options: self.options,
            retry: self.retry.with_sleeper(sleeper),
        }
    }

    /// Maximum items per batch
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Scheduling options
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Retry policy applied to each batch
    pub fn policy(&self) -> &RetryPolicy {
        self.retry.policy()
    }

    /// Sleeper used for delays and backoff
    pub fn sleeper(&self) -> &S {
        self.retry.sleeper()
    }
}

impl<J: JitterSource, S: Sleeper> BatchExecutor<J, S> {
    /// Run `unit_of_work` over every batch of `items`.
    ///
    /// Never fails: per-batch failures are collected in
    /// [`BatchOutcome::errors`].
    pub async fn run<T, R, F, Fut>(&self, items: Vec<T>, unit_of_work: F) -> BatchOutcome<R>
    where
        T: Clone,
        F: Fn(Batch<T>) -> Fut,
        Fut: Future<Output = ErrorResult<R>>,
    {
        self.run_with_cancellation(items, unit_of_work, &CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), stopping when `cancel` fires.
    ///
    /// No batch starts after cancellation. A batch interrupted during its
    /// backoff sleep is recorded as an `OperationFailed` error with the
    /// `batch_executor.cancelled` context, and the outcome is flagged
    /// `cancelled`.
    #[instrument(
        skip_all,
        fields(
            run_id = %Uuid::now_v7(),
            batch_size = self.batch_size,
            max_concurrent = self.options.max_concurrent_batches
        )
    )]
    pub async fn run_with_cancellation<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        unit_of_work: F,
        cancel: &CancellationToken,
    ) -> BatchOutcome<R>
    where
        T: Clone,
        F: Fn(Batch<T>) -> Fut,
        Fut: Future<Output = ErrorResult<R>>,
    {
        let item_count = items.len();
        let batches = split_into_batches(items, self.batch_size);
        let mut outcome = BatchOutcome::new(batches.len());
        debug!(items = item_count, total_batches = outcome.total_batches, "starting batch run");

        let mut pending = batches.into_iter().enumerate().peekable();
        let mut first_step = true;

        while pending.peek().is_some() {
            if !first_step
                && !sleep_or_cancel(self.sleeper(), self.options.delay_between_batches, cancel)
                    .await
            {
                outcome.cancelled = true;
                break;
            }
            first_step = false;

            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let mut in_flight: FuturesUnordered<_> = pending
                .by_ref()
                .take(self.options.max_concurrent_batches)
                .map(|(index, items)| self.run_batch(index, items, &unit_of_work, cancel))
                .collect();

            let mut halt = false;
            while let Some(report) = in_flight.next().await {
                halt |= self.record(&mut outcome, report);
            }

            if halt {
                outcome.stopped_early = true;
                break;
            }
            if cancel.is_cancelled() {
                outcome.cancelled = true;
                break;
            }
        }

        info!(
            total_batches = outcome.total_batches,
            attempted = outcome.attempted_batches,
            succeeded = outcome.results.len(),
            failed = outcome.errors.len(),
            stopped_early = outcome.stopped_early,
            cancelled = outcome.cancelled,
            "batch run finished"
        );
        outcome
    }

    async fn run_batch<T, R, F, Fut>(
        &self,
        index: usize,
        items: Vec<T>,
        unit_of_work: &F,
        cancel: &CancellationToken,
    ) -> BatchReport<R>
    where
        T: Clone,
        F: Fn(Batch<T>) -> Fut,
        Fut: Future<Output = ErrorResult<R>>,
    {
        debug!(batch_index = index, size = items.len(), "starting batch");

        let retried = self
            .retry
            .execute(
                |attempt| {
                    unit_of_work(Batch {
                        index,
                        attempt,
                        items: items.clone(),
                        cancel: cancel.clone(),
                    })
                },
                cancel,
            )
            .await;

        BatchReport { index, attempts: retried.attempts, result: retried.result }
    }

    /// Fold one report into the outcome; returns whether the run must halt
    fn record<R>(&self, outcome: &mut BatchOutcome<R>, report: BatchReport<R>) -> bool {
        if report.attempts == 0 {
            // cancelled before the unit of work ever ran
            outcome.cancelled = true;
            return false;
        }
        outcome.attempted_batches += 1;

        match report.result {
            Ok(result) => {
                debug!(batch_index = report.index, attempts = report.attempts, "batch succeeded");
                outcome.results.push(result);
                false
            }
            Err(failure) => {
                let cancelled = failure.is_cancelled();
                outcome.cancelled |= cancelled;

                let error = failure.into_error();
                warn!(
                    batch_index = report.index,
                    attempts = report.attempts,
                    kind = %error.kind(),
                    context = error.context(),
                    "batch failed"
                );
                outcome.errors.push(BatchError {
                    batch_index: report.index,
                    error,
                    attempts: report.attempts,
                });
                !cancelled && !self.options.continue_on_error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::resilience::NoJitter;
    use crate::testing::RecordingSleeper;

    fn executor(
        batch_size: usize,
        options: BatchOptions,
    ) -> BatchExecutor<NoJitter, RecordingSleeper> {
        let policy = RetryPolicy::builder().max_retries(1).build().unwrap();
        BatchExecutor::new(batch_size, policy, options)
            .unwrap()
            .with_jitter(NoJitter)
            .with_sleeper(RecordingSleeper::new())
    }

    /// Validates splitting preserves order and sizes.
    #[test]
    fn test_split_into_batches() {
        let batches = split_into_batches((1..=7).collect(), 3);
        assert_eq!(batches, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);

        assert!(split_into_batches(Vec::<u8>::new(), 3).is_empty());
        assert_eq!(split_into_batches(vec![1, 2], 0), vec![vec![1], vec![2]]);
    }

    /// Validates constructor validation.
    #[test]
    fn test_constructor_rejects_zero_sizes() {
        let err = BatchExecutor::new(0, RetryPolicy::default(), BatchOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);

        assert!(
            BatchExecutor::new(5, RetryPolicy::default(), BatchOptions::concurrent(0)).is_err()
        );
    }

    /// Validates an empty input performs no work and no sleeps.
    #[tokio::test]
    async fn test_empty_input() {
        let executor = executor(5, BatchOptions::default());
        let outcome = executor.run(Vec::<u32>::new(), |_| async { Ok::<_, ErrorRecord>(()) }).await;

        assert_eq!(outcome.total_batches, 0);
        assert_eq!(outcome.attempted_batches, 0);
        assert!(outcome.results.is_empty());
        assert!(outcome.is_complete());
        assert!(executor.sleeper().recorded().is_empty());
    }

    /// Validates the inter-batch delay sits between steps only.
    ///
    /// Assertions:
    /// - Three batches sleep twice, each for the configured delay.
    #[tokio::test]
    async fn test_delay_between_batches_not_after_last() {
        let options = BatchOptions::sequential().with_delay(Duration::from_millis(500));
        let executor = executor(2, options);

        let outcome = executor
            .run(vec![1, 2, 3, 4, 5], |batch| async move { Ok::<_, ErrorRecord>(batch.index()) })
            .await;

        assert_eq!(outcome.results, vec![0, 1, 2]);
        assert_eq!(executor.sleeper().recorded(), vec![Duration::from_millis(500); 2]);
    }

    /// Validates retried attempts see the same items and increasing attempt
    /// numbers.
    #[tokio::test]
    async fn test_retry_sees_whole_batch() {
        let executor = executor(3, BatchOptions::sequential().with_delay(Duration::ZERO));

        let outcome = executor
            .run(vec!["a", "b", "c"], |batch| async move {
                if batch.attempt() == 0 {
                    Err(ErrorRecord::new(ErrorKind::ServiceUnavailable, "try again"))
                } else {
                    Ok(batch.items().join(""))
                }
            })
            .await;

        assert_eq!(outcome.results, vec!["abc".to_string()]);
        assert_eq!(executor.sleeper().recorded(), vec![Duration::from_millis(1000)]);
    }
}
