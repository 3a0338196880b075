//! Retry delay computation
//!
//! Delays grow as `initial_delay * 2^attempt` and are perturbed by a jitter
//! factor drawn uniformly from `[1 - ratio/2, 1 + ratio/2]`, so the default
//! ratio of `0.4` keeps every delay inside the 0.8..=1.2 band of the base.
//! With exponential growth disabled the delay is the constant initial delay
//! and no jitter is applied.
//!
//! The random source is a [`JitterSource`] so tests can pin it down with
//! [`SeededJitter`] or [`NoJitter`].
//!
//! ```rust
//! use std::time::Duration;
//!
//! use sellerlink_common::resilience::{BackoffCalculator, NoJitter, RetryPolicy};
//!
//! let policy = RetryPolicy::default();
//! let calculator = BackoffCalculator::new(NoJitter);
//!
//! assert_eq!(calculator.next_delay(&policy, 0), Duration::from_millis(1000));
//! assert_eq!(calculator.next_delay(&policy, 3), Duration::from_millis(8000));
//! ```

use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::constants::{
    DEFAULT_INITIAL_RETRY_DELAY, DEFAULT_JITTER_RATIO, DEFAULT_MAX_RETRIES, MAX_BACKOFF_EXPONENT,
};
use crate::error::{ErrorKind, ErrorRecord, ErrorResult};

/// Immutable retry policy shared by every attempt of a batch run
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    use_exponential_backoff: bool,
    jitter_ratio: f64,
    max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_RETRY_DELAY,
            use_exponential_backoff: true,
            jitter_ratio: DEFAULT_JITTER_RATIO,
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    /// Create a policy builder seeded with the defaults
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Number of retries after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the first retry
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Whether delays double per attempt
    pub fn use_exponential_backoff(&self) -> bool {
        self.use_exponential_backoff
    }

    /// Jitter ratio in `[0, 1]`
    pub fn jitter_ratio(&self) -> f64 {
        self.jitter_ratio
    }

    /// Optional ceiling applied after jitter
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// Validate the policy
    pub fn validate(&self) -> ErrorResult<()> {
        if self.initial_delay.is_zero() {
            return Err(invalid("initial retry delay must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.jitter_ratio) {
            return Err(invalid(format!(
                "jitter ratio must be within [0, 1], got {}",
                self.jitter_ratio
            )));
        }
        if let Some(max_delay) = self.max_delay {
            if max_delay < self.initial_delay {
                return Err(invalid(format!(
                    "max delay ({max_delay:?}) cannot be less than initial delay ({:?})",
                    self.initial_delay
                )));
            }
        }
        Ok(())
    }

    /// Un-jittered delay for `attempt`, before the ceiling is applied
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if !self.use_exponential_backoff {
            return self.initial_delay;
        }
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
        let multiplier = 2_u64.saturating_pow(exponent);
        Duration::from_millis(millis(self.initial_delay).saturating_mul(multiplier))
    }
}

fn invalid(message: impl Into<String>) -> ErrorRecord {
    ErrorRecord::new(ErrorKind::InitializationError, message).with_context("retry_policy.build")
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for [`RetryPolicy`] with fluent API
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.policy.max_retries = retries;
        self
    }

    /// Delay before the first retry
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.policy.initial_delay = delay;
        self
    }

    /// Double the delay on each attempt
    pub fn exponential_backoff(mut self, enabled: bool) -> Self {
        self.policy.use_exponential_backoff = enabled;
        self
    }

    /// Set the jitter ratio (0.0 = no jitter, 1.0 = the 0.5..=1.5 band)
    pub fn jitter_ratio(mut self, ratio: f64) -> Self {
        self.policy.jitter_ratio = ratio;
        self
    }

    /// Cap a single delay after jitter
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.policy.max_delay = Some(delay);
        self
    }

    /// Remove the delay ceiling
    pub fn no_max_delay(mut self) -> Self {
        self.policy.max_delay = None;
        self
    }

    /// Validate and build the policy.
    pub fn build(self) -> ErrorResult<RetryPolicy> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}

/// Source of jitter factors
pub trait JitterSource: Send + Sync {
    /// Draw a factor uniformly from `[low, high]`
    fn factor(&self, low: f64, high: f64) -> f64;
}

/// Thread-local RNG, the production default
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn factor(&self, low: f64, high: f64) -> f64 {
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Deterministic jitter from a seeded RNG
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    /// Deterministic jitter from `seed`
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }
}

impl JitterSource for SeededJitter {
    fn factor(&self, low: f64, high: f64) -> f64 {
        self.rng.lock().gen_range(low..=high)
    }
}

/// Always returns a factor of exactly 1
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn factor(&self, _low: f64, _high: f64) -> f64 {
        1.0
    }
}

/// Computes jittered retry delays for a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct BackoffCalculator<J = ThreadRngJitter> {
    jitter: J,
}

impl<J: JitterSource> BackoffCalculator<J> {
    /// Calculator drawing jitter from `jitter`
    pub fn new(jitter: J) -> Self {
        Self { jitter }
    }

    /// Delay before retry number `attempt` (0-based: the first retry is 0)
    pub fn next_delay(&self, policy: &RetryPolicy, attempt: u32) -> Duration {
        let base = policy.base_delay(attempt);
        let jittered = if policy.use_exponential_backoff() && policy.jitter_ratio() > 0.0 {
            let half = policy.jitter_ratio() / 2.0;
            let factor = self.jitter.factor(1.0 - half, 1.0 + half);
            Duration::from_millis((millis(base) as f64 * factor).round() as u64)
        } else {
            base
        };

        match policy.max_delay() {
            Some(ceiling) => jittered.min(ceiling),
            None => jittered,
        }
    }
}

/// Delay for `attempt` using the thread RNG
pub fn next_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    BackoffCalculator::new(ThreadRngJitter).next_delay(policy, attempt)
}
