//! Capability modules: the port, the registry and version negotiation

pub mod ports;
pub mod registry;
pub mod versions;

pub use ports::{CapabilityModule, ModuleConfig, ModuleDescriptor};
pub use registry::ModuleRegistry;
pub use versions::{resolve_api_version, ModuleVersionDefaults};
