//! Whole-operation retry with backoff, jitter and cancellation
//!
//! [`RetryExecutor`] re-runs an operation until it succeeds, the policy's
//! retry budget is spent, the [`RetryCondition`] refuses the error, or the
//! cancellation token fires during a backoff sleep. Attempt numbers are
//! 0-based and are handed to the operation so it can log or vary its work.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::backoff::{BackoffCalculator, JitterSource, RetryPolicy, ThreadRngJitter};
use super::constants::CANCELLED_CONTEXT;
use crate::error::{ErrorClassification, ErrorKind, ErrorRecord, ErrorResult};
use crate::time::{sleep_or_cancel, Sleeper, TokioSleeper};

/// Which failures are worth another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryCondition {
    /// Retry every failure until the budget is spent
    #[default]
    Always,
    /// Stop as soon as a failure is not retryable under
    /// [`ErrorClassification`]
    RetryableOnly,
}

impl RetryCondition {
    /// Whether `error` may be retried
    pub fn allows(&self, error: &ErrorRecord) -> bool {
        match self {
            Self::Always => true,
            Self::RetryableOnly => error.is_retryable(),
        }
    }
}

/// Why a retried operation gave up
#[derive(Debug, Clone, PartialEq)]
pub enum RetryFailure {
    /// The last permitted attempt failed
    Exhausted(ErrorRecord),
    /// The retry condition refused the error
    NonRetryable(ErrorRecord),
    /// Cancelled before or between attempts
    Cancelled(Option<ErrorRecord>),
}

impl RetryFailure {
    /// Whether the failure came from cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Collapse into the record reported to callers.
    ///
    /// A cancellation becomes an `OperationFailed` record with the
    /// `batch_executor.cancelled` context, keeping the interrupted error as
    /// details when there was one.
    pub fn into_error(self) -> ErrorRecord {
        match self {
            Self::Exhausted(error) | Self::NonRetryable(error) => error,
            Self::Cancelled(last_error) => {
                let record = ErrorRecord::new(
                    ErrorKind::OperationFailed,
                    match &last_error {
                        Some(error) => format!("cancelled while retrying: {}", error.message()),
                        None => "cancelled before first attempt".to_string(),
                    },
                )
                .with_context(CANCELLED_CONTEXT);

                match last_error.map(|error| serde_json::to_value(&error)) {
                    Some(Ok(details)) => record.with_details(details),
                    _ => record,
                }
            }
        }
    }
}

/// Outcome of a retry execution including summary statistics
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Final result
    pub result: Result<T, RetryFailure>,
    /// Number of times the operation was invoked
    pub attempts: u32,
    /// Sum of backoff sleeps that completed
    pub total_delay: Duration,
}

impl<T> RetryOutcome<T> {
    /// Drop the statistics
    pub fn into_result(self) -> Result<T, RetryFailure> {
        self.result
    }
}

/// The retry executor
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor<J = ThreadRngJitter, S = TokioSleeper> {
    policy: RetryPolicy,
    backoff: BackoffCalculator<J>,
    sleeper: S,
    condition: RetryCondition,
}

impl RetryExecutor {
    /// Executor with thread-RNG jitter and tokio sleeping
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            backoff: BackoffCalculator::default(),
            sleeper: TokioSleeper,
            condition: RetryCondition::default(),
        }
    }
}

impl<J, S> RetryExecutor<J, S> {
    /// Replace the jitter source
    pub fn with_jitter<J2: JitterSource>(self, jitter: J2) -> RetryExecutor<J2, S> {
        RetryExecutor {
            policy: self.policy,
            backoff: BackoffCalculator::new(jitter),
            sleeper: self.sleeper,
            condition: self.condition,
        }
    }

    /// Replace the sleeper
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> RetryExecutor<J, S2> {
        RetryExecutor {
            policy: self.policy,
            backoff: self.backoff,
            sleeper,
            condition: self.condition,
        }
    }

    /// Set the retry condition
    pub fn with_condition(mut self, condition: RetryCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Retry condition in use
    pub fn condition(&self) -> RetryCondition {
        self.condition
    }

    /// Sleeper in use
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }
}

impl<J: JitterSource, S: Sleeper> RetryExecutor<J, S> {
    /// Delay that would precede retry number `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.next_delay(&self.policy, attempt)
    }

    /// Run `operation` with retry.
    ///
    /// The operation receives the 0-based attempt number. It is invoked at
    /// most `max_retries + 1` times.
    #[instrument(level = "debug", skip_all, fields(max_retries = self.policy.max_retries()))]
    pub async fn execute<F, Fut, T>(
        &self,
        mut operation: F,
        cancel: &CancellationToken,
    ) -> RetryOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ErrorResult<T>>,
    {
        let mut attempt = 0;
        let mut total_delay = Duration::ZERO;

        loop {
            if cancel.is_cancelled() {
                return RetryOutcome {
                    result: Err(RetryFailure::Cancelled(None)),
                    attempts: attempt,
                    total_delay,
                };
            }

            debug!(attempt, "executing operation");

            let error = match operation(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "operation succeeded after retries");
                    }
                    return RetryOutcome { result: Ok(value), attempts: attempt + 1, total_delay };
                }
                Err(error) => error,
            };

            if attempt >= self.policy.max_retries() {
                warn!(
                    attempts = attempt + 1,
                    kind = %error.kind(),
                    context = error.context(),
                    "all retry attempts exhausted"
                );
                return RetryOutcome {
                    result: Err(RetryFailure::Exhausted(error)),
                    attempts: attempt + 1,
                    total_delay,
                };
            }

            if !self.condition.allows(&error) {
                debug!(kind = %error.kind(), "retry condition refused error");
                return RetryOutcome {
                    result: Err(RetryFailure::NonRetryable(error)),
                    attempts: attempt + 1,
                    total_delay,
                };
            }

            let delay = self.delay_for(attempt);
            warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                kind = %error.kind(),
                "operation failed, retrying"
            );

            if !sleep_or_cancel(&self.sleeper, delay, cancel).await {
                debug!(attempt, "cancelled during backoff");
                return RetryOutcome {
                    result: Err(RetryFailure::Cancelled(Some(error))),
                    attempts: attempt + 1,
                    total_delay,
                };
            }

            total_delay += delay;
            attempt += 1;
        }
    }
}
