//! In-memory capability module for registry tests

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sellerlink_common::error::{ErrorKind, ErrorRecord, ErrorResult};
use sellerlink_core::{
    resolve_api_version, ApiResponse, CapabilityModule, HttpMethod, ModuleConfig,
    ModuleDescriptor, ModuleVersionDefaults, RequestOptions,
};
use serde_json::json;

/// Module that echoes the request path and counts calls.
///
/// `tag` distinguishes instances registered under the same name.
pub struct EchoModule {
    capability: String,
    tag: &'static str,
    config: Option<ModuleConfig>,
    calls: Arc<AtomicUsize>,
}

impl EchoModule {
    pub fn new(capability: &str, tag: &'static str) -> Self {
        Self {
            capability: capability.to_string(),
            tag,
            config: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Construct and initialize with a negotiated API version.
    pub fn negotiated(
        capability: &str,
        explicit: Option<&str>,
        defaults: &ModuleVersionDefaults,
        fallback: &str,
    ) -> ErrorResult<Self> {
        let mut module = Self::new(capability, "negotiated");
        let version = resolve_api_version(explicit, defaults, capability, fallback);
        module.initialize(ModuleConfig::new("ATVPDKIKX0DER", version))?;
        Ok(module)
    }

    /// Initialize with a fixed marketplace and version `v1`.
    pub fn initialize_default(&mut self) -> ErrorResult<()> {
        self.initialize(ModuleConfig::new("ATVPDKIKX0DER", "v1"))
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityModule for EchoModule {
    fn descriptor(&self) -> ModuleDescriptor {
        let (marketplace_id, api_version) = match &self.config {
            Some(config) => (config.marketplace_id.clone(), config.api_version.clone()),
            None => (String::new(), String::new()),
        };
        ModuleDescriptor { capability_name: self.capability.clone(), api_version, marketplace_id }
    }

    fn initialize(&mut self, config: ModuleConfig) -> ErrorResult<()> {
        config.validate(&self.capability)?;
        self.config = Some(config);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.config.is_some()
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        _options: RequestOptions,
    ) -> ErrorResult<ApiResponse> {
        if !self.is_initialized() {
            return Err(ErrorRecord::new(ErrorKind::NotInitialized, "module not initialized")
                .with_context(format!("{}.request", self.capability)));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ApiResponse::ok(json!({"method": method.as_str(), "path": path, "tag": self.tag})))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
