//! # SellerLink Core
//!
//! Ports and registry for marketplace capability modules - no HTTP,
//! no configuration loading.
//!
//! This crate contains:
//! - The [`ApiClient`] boundary trait and its request/response types
//! - The [`CapabilityModule`] port and the [`ModuleRegistry`]
//! - API version negotiation ([`ModuleVersionDefaults`])
//! - The connection configuration model
//!
//! ## Architecture Principles
//! - Only depends on `sellerlink-common`
//! - Concrete modules and loaders live in `sellerlink-infra`
//! - All external dependencies via traits

pub mod api_ports;
pub mod config;
pub mod modules;

pub use api_ports::{ApiClient, ApiResponse, HttpMethod, RequestOptions};
pub use config::ConnectionConfig;
pub use modules::versions::{
    APPLICATION_INTEGRATIONS, AUTHORIZATION, BRAND_PROTECTION, CAPABILITIES, EASY_SHIP,
    PRODUCT_TYPE_DEFINITIONS, VENDORS,
};
pub use modules::{
    resolve_api_version, CapabilityModule, ModuleConfig, ModuleDescriptor, ModuleRegistry,
    ModuleVersionDefaults,
};
