//! Custom assertions for testing
//!
//! Assertions for the invariants the resilience layer promises: error kinds
//! on results, retry delays inside their jitter band, and batches that
//! cover their input exactly once.

// Assertions are designed to panic on failure
#![allow(clippy::missing_panics_doc)]

use std::fmt::Debug;
use std::time::Duration;

/// Assert that a result failed with a specific [`ErrorKind`](crate::error::ErrorKind)
///
/// # Examples
///
/// ```
/// use sellerlink_common::error::{ErrorKind, ErrorRecord};
///
/// let result: Result<(), ErrorRecord> = Err(ErrorRecord::new(ErrorKind::Unauthorized, "no"));
/// sellerlink_common::assert_error_kind!(result, ErrorKind::Unauthorized);
/// ```
#[macro_export]
macro_rules! assert_error_kind {
    ($result:expr, $expected_kind:expr $(,)?) => {{
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let actual_kind = e.kind();
                let expected_kind = $expected_kind;
                assert_eq!(
                    actual_kind, expected_kind,
                    "Error kind mismatch: expected {:?}, got {:?} ({})",
                    expected_kind, actual_kind, e
                );
            }
        }
    }};
}

/// Assert that a jittered delay lies in `[base * (1 - ratio/2), base * (1 + ratio/2)]`
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use sellerlink_common::testing::assert_delay_within_band;
///
/// assert_delay_within_band(Duration::from_millis(1100), Duration::from_secs(1), 0.4);
/// ```
pub fn assert_delay_within_band(actual: Duration, base: Duration, ratio: f64) {
    let base_ms = base.as_millis() as f64;
    let low = (base_ms * (1.0 - ratio / 2.0)).floor();
    let high = (base_ms * (1.0 + ratio / 2.0)).ceil();
    let actual_ms = actual.as_millis() as f64;

    assert!(
        (low..=high).contains(&actual_ms),
        "Delay {actual:?} outside [{low}ms, {high}ms] for base {base:?} and ratio {ratio}"
    );
}

/// Assert that `batches`, flattened, reproduce `items` in order and that no
/// batch exceeds `batch_size`
pub fn assert_batches_cover<T>(batches: &[Vec<T>], items: &[T], batch_size: usize)
where
    T: Debug + PartialEq,
{
    for (index, batch) in batches.iter().enumerate() {
        assert!(
            !batch.is_empty() && batch.len() <= batch_size,
            "Batch {index} has {} items, expected 1..={batch_size}",
            batch.len()
        );
    }

    let flattened: Vec<&T> = batches.iter().flatten().collect();
    let expected: Vec<&T> = items.iter().collect();
    assert_eq!(flattened, expected, "Batches do not cover the input exactly once, in order");
}
