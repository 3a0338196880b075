//! # SellerLink Infrastructure
//!
//! Adapters behind the ports defined in `sellerlink-core`.
//!
//! This crate contains:
//! - The shared module request client
//! - Concrete capability modules (vendors, authorization, brand protection,
//!   product type definitions, application integrations, easy ship)
//! - Per-capability factories and the marketplace connection context
//! - Configuration loading and tracing initialisation
//!
//! ## Architecture
//! - Implements traits defined in `sellerlink-core`
//! - Depends on `sellerlink-common` and `sellerlink-core`
//! - Never talks HTTP itself; the caller supplies an `ApiClient`

pub mod api;
pub mod config;
pub mod connection;
pub mod factory;
pub mod modules;
pub mod observability;

// Re-export commonly used items
pub use api::ModuleClient;
pub use connection::MarketplaceConnection;
pub use factory::ModuleFactory;
pub use modules::{
    ApplicationIntegrationsModule, AuthorizationModule, BrandProtectionModule, EasyShipModule,
    ProductTypeDefinitionsModule, VendorsModule, VersionedModule,
};
pub use observability::{init_tracing, LogFormat};
