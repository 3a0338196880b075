//! Request plumbing shared by the capability modules
//!
//! The boundary [`ApiClient`](sellerlink_core::ApiClient) is supplied by the
//! caller; this module only wraps it with initialization checks, error
//! mapping and request tracing.

pub mod module_client;

pub use module_client::ModuleClient;
