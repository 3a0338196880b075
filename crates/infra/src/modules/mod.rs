//! Concrete capability modules
//!
//! Each module is a thin typed surface over one vendor API: methods build a
//! path and options, route through the module's [`ModuleClient`] and
//! deserialize the JSON reply. No business rules live here.
//!
//! [`ModuleClient`]: crate::api::ModuleClient

use std::sync::Arc;

use sellerlink_core::{ApiClient, CapabilityModule};
use serde::Deserialize;

/// Implements [`CapabilityModule`] by delegating to the `client` field.
macro_rules! delegate_capability_module {
    ($module:ty) => {
        #[async_trait::async_trait]
        impl sellerlink_core::CapabilityModule for $module {
            fn descriptor(&self) -> sellerlink_core::ModuleDescriptor {
                self.client.descriptor()
            }

            fn initialize(
                &mut self,
                config: sellerlink_core::ModuleConfig,
            ) -> sellerlink_common::error::ErrorResult<()> {
                self.client.initialize(config)
            }

            fn is_initialized(&self) -> bool {
                self.client.is_initialized()
            }

            async fn request(
                &self,
                method: sellerlink_core::HttpMethod,
                path: &str,
                options: sellerlink_core::RequestOptions,
            ) -> sellerlink_common::error::ErrorResult<sellerlink_core::ApiResponse> {
                self.client.send("request", method, path, options).await
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    };
}

pub(crate) use delegate_capability_module;

pub mod application_integrations;
pub mod authorization;
pub mod brand_protection;
pub mod easy_ship;
pub mod product_type_definitions;
pub mod vendors;

pub use application_integrations::ApplicationIntegrationsModule;
pub use authorization::AuthorizationModule;
pub use brand_protection::BrandProtectionModule;
pub use easy_ship::EasyShipModule;
pub use product_type_definitions::ProductTypeDefinitionsModule;
pub use vendors::VendorsModule;

/// A module the factory knows how to build
pub trait VersionedModule: CapabilityModule + Sized {
    /// Registry key
    const CAPABILITY: &'static str;
    /// Version used when neither the caller nor the defaults name one
    const FALLBACK_VERSION: &'static str;

    /// Construct an uninitialized module
    fn with_client(client: Arc<dyn ApiClient>) -> Self;
}

/// `{"payload": ...}` wrapper used by the older vendor APIs
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub payload: T,
}
