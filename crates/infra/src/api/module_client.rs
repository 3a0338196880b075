//! Shared request path for capability modules
//!
//! Every concrete module wraps a [`ModuleClient`]. It owns the boundary
//! client handle and the module's initialization state, refuses requests
//! before `initialize`, and maps boundary failures into [`ErrorRecord`]s
//! whose context is `{capability}.{operation}`.

use std::fmt;
use std::sync::Arc;

use sellerlink_common::error::{map_http_error, ErrorKind, ErrorRecord, ErrorResult};
use sellerlink_core::{
    ApiClient, ApiResponse, HttpMethod, ModuleConfig, ModuleDescriptor, RequestOptions,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// Boundary client plus initialization state for one module
#[derive(Clone)]
pub struct ModuleClient {
    capability: &'static str,
    client: Arc<dyn ApiClient>,
    config: Option<ModuleConfig>,
}

impl ModuleClient {
    /// Uninitialized client for `capability`
    pub fn new(capability: &'static str, client: Arc<dyn ApiClient>) -> Self {
        Self { capability, client, config: None }
    }

    /// Capability name used in error contexts
    pub fn capability(&self) -> &'static str {
        self.capability
    }

    /// Validate and store `config`; a failed validation leaves the
    /// previous state untouched.
    pub fn initialize(&mut self, config: ModuleConfig) -> ErrorResult<()> {
        config.validate(self.capability)?;
        debug!(
            capability = self.capability,
            api_version = %config.api_version,
            marketplace_id = %config.marketplace_id,
            "module initialized"
        );
        self.config = Some(config);
        Ok(())
    }

    /// Whether `initialize` succeeded
    pub fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    /// Empty until initialized
    pub fn api_version(&self) -> &str {
        self.config.as_ref().map_or("", |c| c.api_version.as_str())
    }

    /// Empty until initialized
    pub fn marketplace_id(&self) -> &str {
        self.config.as_ref().map_or("", |c| c.marketplace_id.as_str())
    }

    /// Descriptor of the bound module; empty fields before initialisation
    pub fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor {
            capability_name: self.capability.to_string(),
            api_version: self.api_version().to_string(),
            marketplace_id: self.marketplace_id().to_string(),
        }
    }

    fn context(&self, operation: &str) -> String {
        format!("{}.{operation}", self.capability)
    }

    /// Send a request on behalf of `operation`.
    ///
    /// # Errors
    ///
    /// `NotInitialized` before [`initialize`](Self::initialize), without
    /// calling the boundary client; otherwise the mapped boundary error.
    #[instrument(
        name = "module_request",
        skip_all,
        fields(capability = self.capability, operation = %operation, method = %method, path = %path)
    )]
    pub async fn send(
        &self,
        operation: &str,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> ErrorResult<ApiResponse> {
        let context = self.context(operation);
        if !self.is_initialized() {
            return Err(ErrorRecord::new(
                ErrorKind::NotInitialized,
                format!("{} module used before initialize", self.capability),
            )
            .with_context(context));
        }

        match self.client.request(method, path, options).await {
            Ok(response) => {
                debug!(status = response.status, "module request succeeded");
                Ok(response)
            }
            Err(raw) => {
                let error = map_http_error(&raw, &context);
                warn!(
                    context = %error.context(),
                    kind = %error.kind(),
                    status = ?error.http_status(),
                    "module request failed"
                );
                Err(error)
            }
        }
    }

    /// [`send`](Self::send) and deserialize the payload.
    ///
    /// A payload that does not match `T` fails with `OperationFailed`
    /// under the same context.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> ErrorResult<T> {
        let response = self.send(operation, method, path, options).await?;
        response.json().map_err(|err| {
            ErrorRecord::new(ErrorKind::OperationFailed, format!("unexpected response body: {err}"))
                .with_context(self.context(operation))
                .with_http_status(response.status)
        })
    }
}

impl fmt::Debug for ModuleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleClient")
            .field("capability", &self.capability)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use sellerlink_common::error::RawError;
    use serde_json::json;

    use super::*;

    /// Boundary stub returning one canned result and counting calls
    struct CannedClient {
        result: Result<ApiResponse, RawError>,
        calls: Mutex<usize>,
    }

    impl CannedClient {
        fn new(result: Result<ApiResponse, RawError>) -> Arc<Self> {
            Arc::new(Self { result, calls: Mutex::new(0) })
        }

        fn calls(&self) -> usize {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl ApiClient for CannedClient {
        async fn request(
            &self,
            _method: HttpMethod,
            _path: &str,
            _options: RequestOptions,
        ) -> Result<ApiResponse, RawError> {
            *self.calls.lock() += 1;
            self.result.clone()
        }
    }

    fn ready(client: Arc<CannedClient>) -> ModuleClient {
        let mut module = ModuleClient::new("vendors", client);
        module.initialize(ModuleConfig::new("ATVPDKIKX0DER", "v1")).unwrap();
        module
    }

    /// Validates requests before initialize never reach the boundary.
    ///
    /// Assertions:
    /// - The error kind is `NotInitialized`.
    /// - The context names capability and operation.
    /// - The boundary client saw no calls.
    #[tokio::test]
    async fn test_send_before_initialize() {
        let client = CannedClient::new(Ok(ApiResponse::ok(json!({}))));
        let module = ModuleClient::new("vendors", client.clone());

        let err = module
            .send("get_purchase_orders", HttpMethod::Get, "/x", RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotInitialized);
        assert_eq!(err.context(), "vendors.get_purchase_orders");
        assert_eq!(client.calls(), 0);
    }

    /// Validates boundary errors are mapped with the operation context.
    #[tokio::test]
    async fn test_send_maps_errors() {
        let client = CannedClient::new(Err(RawError::from_response(
            403,
            &json!({"errors": [{"code": "QuotaExceeded", "message": "You exceeded your quota"}]}),
        )));
        let module = ready(client);

        let err = module
            .send("get_purchase_order", HttpMethod::Get, "/x", RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::QuotaExceeded);
        assert_eq!(err.context(), "vendors.get_purchase_order");
        assert_eq!(err.http_status(), Some(403));
        assert_eq!(err.vendor_code(), Some("QuotaExceeded"));
    }

    #[tokio::test]
    async fn test_send_json_rejects_mismatched_payload() {
        let module = ready(CannedClient::new(Ok(ApiResponse::ok(json!("not an object")))));

        let err = module
            .send_json::<Vec<u32>>("list", HttpMethod::Get, "/x", RequestOptions::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::OperationFailed);
        assert_eq!(err.context(), "vendors.list");
        assert_eq!(err.http_status(), Some(200));
    }

    #[test]
    fn test_failed_initialize_keeps_state() {
        let client = CannedClient::new(Err(RawError::http_status(500, None)));
        let mut module = ModuleClient::new("easyShip", client);
        assert!(module.initialize(ModuleConfig::new("", "2022-03-23")).is_err());
        assert!(!module.is_initialized());
        assert_eq!(module.api_version(), "");
        assert_eq!(module.descriptor().capability_name, "easyShip");
    }
}
