//! Shared test helpers for `sellerlink-core` integration tests.

pub mod modules;
