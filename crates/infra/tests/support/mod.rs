//! Shared test helpers for `sellerlink-infra` integration tests.
//!
//! [`ScriptedClient`] stands in for the caller's HTTP client: it replays a
//! queue of canned responses and errors and logs every request it sees.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sellerlink_common::error::RawError;
use sellerlink_core::{ApiClient, ApiResponse, HttpMethod, RequestOptions};
use serde_json::Value;

/// One request observed by [`ScriptedClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub options: RequestOptions,
}

/// Boundary client replaying a script in FIFO order.
///
/// Once the script runs out every request fails with a transport error,
/// so an unexpected extra call shows up as a test failure.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<ApiResponse, RawError>>>,
    log: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a 200 response carrying `data`
    pub fn ok(self: &Arc<Self>, data: Value) -> Arc<Self> {
        self.push(Ok(ApiResponse::ok(data)))
    }

    /// Queue a failure built the way a real client would from a response
    pub fn fail(self: &Arc<Self>, status: u16, body: Value) -> Arc<Self> {
        self.push(Err(RawError::from_response(status, &body)))
    }

    pub fn push(self: &Arc<Self>, result: Result<ApiResponse, RawError>) -> Arc<Self> {
        self.script.lock().push_back(result);
        Arc::clone(self)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.log.lock().len()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl ApiClient for ScriptedClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, RawError> {
        self.log.lock().push(RecordedRequest { method, path: path.to_string(), options });
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RawError::transport("script exhausted", false)))
    }
}

/// Coerce for APIs taking the trait object
pub fn as_client(client: &Arc<ScriptedClient>) -> Arc<dyn ApiClient> {
    Arc::clone(client) as Arc<dyn ApiClient>
}
