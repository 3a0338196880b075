//! Injectable sleeping
//!
//! Every pause taken by the batch executor (inter-batch delay and retry
//! backoff) goes through a [`Sleeper`], and every pause can be cut short by
//! a [`CancellationToken`].

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Something that can wait for a duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<S: Sleeper + ?Sized> Sleeper for std::sync::Arc<S> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// Sleep unless `cancel` fires first.
///
/// Returns `true` when the full duration elapsed and `false` when the wait
/// was cancelled. A zero duration never reaches the sleeper.
pub async fn sleep_or_cancel<S>(sleeper: &S, duration: Duration, cancel: &CancellationToken) -> bool
where
    S: Sleeper + ?Sized,
{
    if cancel.is_cancelled() {
        return false;
    }
    if duration.is_zero() {
        return true;
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = sleeper.sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates an uncancelled sleep completes.
    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes() {
        let token = CancellationToken::new();
        assert!(sleep_or_cancel(&TokioSleeper, Duration::from_secs(30), &token).await);
    }

    /// Validates a pre-cancelled token short-circuits even zero sleeps.
    #[tokio::test]
    async fn test_cancelled_before_sleep() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(!sleep_or_cancel(&TokioSleeper, Duration::ZERO, &token).await);
        assert!(!sleep_or_cancel(&TokioSleeper, Duration::from_secs(30), &token).await);
    }

    /// Validates cancellation interrupts a sleep in progress.
    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_sleep() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        assert!(!sleep_or_cancel(&TokioSleeper, Duration::from_secs(3600), &token).await);
    }
}
