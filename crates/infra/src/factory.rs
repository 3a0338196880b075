//! Capability module factory
//!
//! A [`ModuleFactory`] is bound to one boundary client, one marketplace and
//! one set of [`ModuleVersionDefaults`]. Creating a module negotiates its
//! API version (explicit, then configured default, then the module's own
//! fallback), initializes it, and registers it.

use std::sync::Arc;

use sellerlink_common::error::{ErrorKind, ErrorRecord, ErrorResult};
use sellerlink_core::{
    resolve_api_version, ApiClient, ModuleConfig, ModuleRegistry, ModuleVersionDefaults,
};
use tracing::info;

use crate::modules::{
    ApplicationIntegrationsModule, AuthorizationModule, BrandProtectionModule, EasyShipModule,
    ProductTypeDefinitionsModule, VendorsModule, VersionedModule,
};

/// Builds initialized capability modules for one marketplace
#[derive(Clone)]
pub struct ModuleFactory {
    client: Arc<dyn ApiClient>,
    marketplace_id: String,
    defaults: ModuleVersionDefaults,
}

impl ModuleFactory {
    /// Factory for `marketplace_id` with injected version defaults
    pub fn new(
        client: Arc<dyn ApiClient>,
        marketplace_id: impl Into<String>,
        defaults: ModuleVersionDefaults,
    ) -> Self {
        Self { client, marketplace_id: marketplace_id.into(), defaults }
    }

    /// Marketplace new modules bind to
    pub fn marketplace_id(&self) -> &str {
        &self.marketplace_id
    }

    /// Configured version defaults
    pub fn defaults(&self) -> &ModuleVersionDefaults {
        &self.defaults
    }

    /// The version `M` would be created with
    pub fn resolve_version<M: VersionedModule>(&self, explicit: Option<&str>) -> String {
        resolve_api_version(explicit, &self.defaults, M::CAPABILITY, M::FALLBACK_VERSION)
    }

    /// Construct and initialize `M` without registering it.
    ///
    /// # Errors
    ///
    /// `InitializationError` if the marketplace id is blank.
    pub fn create<M: VersionedModule>(&self, api_version: Option<&str>) -> ErrorResult<M> {
        let version = self.resolve_version::<M>(api_version);
        let mut module = M::with_client(Arc::clone(&self.client));
        module.initialize(ModuleConfig::new(self.marketplace_id.clone(), version))?;
        Ok(module)
    }

    /// Create `M`, register it under its capability name and borrow it back.
    ///
    /// A module already registered under that name is replaced.
    pub fn create_and_register<'r, M: VersionedModule>(
        &self,
        registry: &'r mut ModuleRegistry,
        api_version: Option<&str>,
    ) -> ErrorResult<&'r M> {
        let module = self.create::<M>(api_version)?;
        let descriptor = module.descriptor();
        let replaced = registry.register(M::CAPABILITY, Box::new(module)).is_some();
        info!(
            capability = M::CAPABILITY,
            api_version = %descriptor.api_version,
            marketplace_id = %descriptor.marketplace_id,
            replaced,
            "capability module ready"
        );

        registry.get_typed::<M>(M::CAPABILITY).ok_or_else(|| {
            ErrorRecord::new(ErrorKind::InternalError, "registered module has an unexpected type")
                .with_context(format!("{}.create", M::CAPABILITY))
        })
    }

    /// Create and register the vendors module
    pub fn create_vendors_module<'r>(
        &self,
        registry: &'r mut ModuleRegistry,
        api_version: Option<&str>,
    ) -> ErrorResult<&'r VendorsModule> {
        self.create_and_register(registry, api_version)
    }

    /// Create and register the authorization module
    pub fn create_authorization_module<'r>(
        &self,
        registry: &'r mut ModuleRegistry,
        api_version: Option<&str>,
    ) -> ErrorResult<&'r AuthorizationModule> {
        self.create_and_register(registry, api_version)
    }

    /// Create and register the brand protection module
    pub fn create_brand_protection_module<'r>(
        &self,
        registry: &'r mut ModuleRegistry,
        api_version: Option<&str>,
    ) -> ErrorResult<&'r BrandProtectionModule> {
        self.create_and_register(registry, api_version)
    }

    /// Create and register the product type definitions module
    pub fn create_product_type_definitions_module<'r>(
        &self,
        registry: &'r mut ModuleRegistry,
        api_version: Option<&str>,
    ) -> ErrorResult<&'r ProductTypeDefinitionsModule> {
        self.create_and_register(registry, api_version)
    }

    /// Create and register the application integrations module
    pub fn create_application_integrations_module<'r>(
        &self,
        registry: &'r mut ModuleRegistry,
        api_version: Option<&str>,
    ) -> ErrorResult<&'r ApplicationIntegrationsModule> {
        self.create_and_register(registry, api_version)
    }

    /// Create and register the Easy Ship module
    pub fn create_easy_ship_module<'r>(
        &self,
        registry: &'r mut ModuleRegistry,
        api_version: Option<&str>,
    ) -> ErrorResult<&'r EasyShipModule> {
        self.create_and_register(registry, api_version)
    }

    /// Register every built-in capability with its negotiated version
    pub fn register_all(&self, registry: &mut ModuleRegistry) -> ErrorResult<()> {
        self.create_and_register::<VendorsModule>(registry, None)?;
        self.create_and_register::<AuthorizationModule>(registry, None)?;
        self.create_and_register::<BrandProtectionModule>(registry, None)?;
        self.create_and_register::<ProductTypeDefinitionsModule>(registry, None)?;
        self.create_and_register::<ApplicationIntegrationsModule>(registry, None)?;
        self.create_and_register::<EasyShipModule>(registry, None)?;
        Ok(())
    }
}

impl std::fmt::Debug for ModuleFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleFactory")
            .field("marketplace_id", &self.marketplace_id)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
