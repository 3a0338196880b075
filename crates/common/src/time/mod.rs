//! Time abstractions for the runtime tier
//!
//! - **[`sleeper`]**: injectable, cancellable sleeping used by the batch
//!   executor
//!
//! Deterministic stand-ins live in [`crate::testing`].

pub mod sleeper;

pub use sleeper::{sleep_or_cancel, Sleeper, TokioSleeper};
