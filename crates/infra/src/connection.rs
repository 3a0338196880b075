//! Per-marketplace connection context
//!
//! A [`MarketplaceConnection`] owns the module registry and the factory for
//! one marketplace. Nothing is shared between connections; dropping the
//! connection drops its modules.

use std::sync::Arc;

use sellerlink_common::error::ErrorResult;
use sellerlink_common::resilience::BatchExecutor;
use sellerlink_core::{ApiClient, CapabilityModule, ConnectionConfig, ModuleRegistry};
use tracing::{info, instrument};

use crate::config::loader;
use crate::factory::ModuleFactory;
use crate::modules::{
    ApplicationIntegrationsModule, AuthorizationModule, BrandProtectionModule, EasyShipModule,
    ProductTypeDefinitionsModule, VendorsModule, VersionedModule,
};

/// Registry, factory and batch settings for one marketplace connection
#[derive(Debug)]
pub struct MarketplaceConnection {
    config: ConnectionConfig,
    factory: ModuleFactory,
    registry: ModuleRegistry,
}

impl MarketplaceConnection {
    /// # Errors
    ///
    /// `InitializationError` if `config` fails validation.
    #[instrument(skip_all, fields(marketplace_id = %config.marketplace_id))]
    pub fn new(config: ConnectionConfig, client: Arc<dyn ApiClient>) -> ErrorResult<Self> {
        config.validate()?;
        let factory = ModuleFactory::new(
            client,
            config.marketplace_id.clone(),
            config.module_versions.clone(),
        );
        info!("marketplace connection created");
        Ok(Self { config, factory, registry: ModuleRegistry::new() })
    }

    /// Connect using configuration from the environment or a config file
    pub fn from_environment(client: Arc<dyn ApiClient>) -> ErrorResult<Self> {
        Self::new(loader::load()?, client)
    }

    /// Connection settings
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Factory bound to this marketplace
    pub fn factory(&self) -> &ModuleFactory {
        &self.factory
    }

    /// Registered modules
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Hand the populated registry out for shared read-only use
    pub fn into_registry(self) -> Arc<ModuleRegistry> {
        Arc::new(self.registry)
    }

    /// Batch executor built from the connection's batch settings
    pub fn batch_executor(&self) -> ErrorResult<BatchExecutor> {
        BatchExecutor::from_config(&self.config.batch)
    }

    /// Create and register `M`, replacing any earlier instance
    pub fn register<M: VersionedModule>(&mut self, api_version: Option<&str>) -> ErrorResult<&M> {
        self.factory.create_and_register::<M>(&mut self.registry, api_version)
    }

    /// Register every built-in capability with its negotiated version
    pub fn register_all(&mut self) -> ErrorResult<()> {
        self.factory.register_all(&mut self.registry)
    }

    /// Borrow a registered module by capability name.
    ///
    /// # Panics
    ///
    /// Panics if `capability` was never registered.
    pub fn module(&self, capability: &str) -> &dyn CapabilityModule {
        self.registry.get(capability)
    }

    /// The vendors module, if registered
    pub fn vendors(&self) -> Option<&VendorsModule> {
        self.typed()
    }

    /// The authorization module, if registered
    pub fn authorization(&self) -> Option<&AuthorizationModule> {
        self.typed()
    }

    /// The brand protection module, if registered
    pub fn brand_protection(&self) -> Option<&BrandProtectionModule> {
        self.typed()
    }

    /// The product type definitions module, if registered
    pub fn product_type_definitions(&self) -> Option<&ProductTypeDefinitionsModule> {
        self.typed()
    }

    /// The application integrations module, if registered
    pub fn application_integrations(&self) -> Option<&ApplicationIntegrationsModule> {
        self.typed()
    }

    /// The Easy Ship module, if registered
    pub fn easy_ship(&self) -> Option<&EasyShipModule> {
        self.typed()
    }

    fn typed<M: VersionedModule>(&self) -> Option<&M> {
        self.registry.get_typed::<M>(M::CAPABILITY)
    }
}
