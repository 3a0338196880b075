//! Port interface for versioned capability modules

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use sellerlink_common::error::{ErrorKind, ErrorRecord, ErrorResult};
use serde::{Deserialize, Serialize};

use crate::api_ports::{ApiResponse, HttpMethod, RequestOptions};

/// Identity of a registered capability module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    /// Capability name, e.g. `vendors`
    pub capability_name: String,
    /// Negotiated API version
    pub api_version: String,
    /// Marketplace the module is bound to
    pub marketplace_id: String,
}

impl fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.capability_name, self.api_version, self.marketplace_id)
    }
}

/// Settings handed to [`CapabilityModule::initialize`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Marketplace to bind to
    pub marketplace_id: String,
    /// API version to use in request paths
    pub api_version: String,
}

impl ModuleConfig {
    /// Module settings
    pub fn new(marketplace_id: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self { marketplace_id: marketplace_id.into(), api_version: api_version.into() }
    }

    /// Reject blank marketplace ids and API versions.
    ///
    /// `capability` names the module in the error context
    /// (`{capability}.initialize`).
    pub fn validate(&self, capability: &str) -> ErrorResult<()> {
        let context = format!("{capability}.initialize");
        if self.marketplace_id.trim().is_empty() {
            return Err(ErrorRecord::new(
                ErrorKind::InitializationError,
                "marketplace id must not be empty",
            )
            .with_context(context));
        }
        if self.api_version.trim().is_empty() {
            return Err(ErrorRecord::new(
                ErrorKind::InitializationError,
                "api version must not be empty",
            )
            .with_context(context));
        }
        Ok(())
    }
}

/// Uniform contract implemented by every vendor capability module
///
/// Modules are constructed uninitialized, configured once through
/// [`initialize`](Self::initialize), and then serve requests. A request
/// before initialization fails with [`ErrorKind::NotInitialized`] without
/// touching the boundary client.
#[async_trait]
pub trait CapabilityModule: Send + Sync + Any {
    /// Capability name, API version and marketplace of this instance
    fn descriptor(&self) -> ModuleDescriptor;

    /// Validate `config` and mark the module ready.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InitializationError`] if the marketplace id or
    /// API version is blank.
    fn initialize(&mut self, config: ModuleConfig) -> ErrorResult<()>;

    fn is_initialized(&self) -> bool;

    /// Send a request through the boundary client.
    ///
    /// Failures are mapped into an [`ErrorRecord`] whose context is
    /// `{capability}.request`.
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> ErrorResult<ApiResponse>;

    /// Upcast used for typed borrowing out of the registry
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates blank settings are rejected with the module's context.
    ///
    /// Assertions:
    /// - Empty and whitespace-only values fail with `InitializationError`.
    /// - The context names the capability.
    #[test]
    fn test_module_config_validation() {
        assert!(ModuleConfig::new("ATVPDKIKX0DER", "v1").validate("vendors").is_ok());

        let err = ModuleConfig::new("  ", "v1").validate("vendors").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);
        assert_eq!(err.context(), "vendors.initialize");

        let err = ModuleConfig::new("ATVPDKIKX0DER", "").validate("easyShip").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);
        assert_eq!(err.context(), "easyShip.initialize");
    }

    #[test]
    fn test_descriptor_display() {
        let descriptor = ModuleDescriptor {
            capability_name: "easyShip".into(),
            api_version: "2022-03-23".into(),
            marketplace_id: "A1PA6795UKMFR9".into(),
        };
        assert_eq!(descriptor.to_string(), "easyShip@2022-03-23 (A1PA6795UKMFR9)");
    }
}
