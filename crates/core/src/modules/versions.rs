//! Capability names and API version negotiation

use std::collections::BTreeMap;
use std::str::FromStr;

use sellerlink_common::error::{ErrorKind, ErrorRecord};
use serde::{Deserialize, Serialize};

/// Vendor orders
pub const VENDORS: &str = "vendors";
/// Authorization codes
pub const AUTHORIZATION: &str = "authorization";
/// Brand protection cases
pub const BRAND_PROTECTION: &str = "brandProtection";
/// Product type definitions
pub const PRODUCT_TYPE_DEFINITIONS: &str = "productTypeDefinitions";
/// Application integration notifications
pub const APPLICATION_INTEGRATIONS: &str = "applicationIntegrations";
/// Easy Ship scheduling
pub const EASY_SHIP: &str = "easyShip";

/// Every built-in capability name
pub const CAPABILITIES: [&str; 6] = [
    VENDORS,
    AUTHORIZATION,
    BRAND_PROTECTION,
    PRODUCT_TYPE_DEFINITIONS,
    APPLICATION_INTEGRATIONS,
    EASY_SHIP,
];

/// Configured default API version per capability
///
/// Injected into factories so two connections can negotiate different
/// versions for the same capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleVersionDefaults {
    versions: BTreeMap<String, String>,
}

impl ModuleVersionDefaults {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set)
    pub fn with(mut self, capability: impl Into<String>, version: impl Into<String>) -> Self {
        self.set(capability, version);
        self
    }

    /// Set or replace the default for `capability`
    pub fn set(&mut self, capability: impl Into<String>, version: impl Into<String>) {
        self.versions.insert(capability.into(), version.into());
    }

    /// Default version for `capability`
    pub fn get(&self, capability: &str) -> Option<&str> {
        self.versions.get(capability).map(String::as_str)
    }

    /// Entries from `other` replace entries here
    pub fn merge(&mut self, other: &ModuleVersionDefaults) {
        for (capability, version) in &other.versions {
            self.versions.insert(capability.clone(), version.clone());
        }
    }

    /// Whether no defaults are configured
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Entries in capability order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.versions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parses `capability=version` pairs separated by commas.
///
/// Blank segments are skipped so trailing commas are harmless.
impl FromStr for ModuleVersionDefaults {
    type Err = ErrorRecord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut defaults = Self::new();
        for segment in s.split(',').map(str::trim).filter(|seg| !seg.is_empty()) {
            let Some((capability, version)) = segment.split_once('=') else {
                return Err(ErrorRecord::new(
                    ErrorKind::InitializationError,
                    format!("expected capability=version, got '{segment}'"),
                )
                .with_context("config.module_versions"));
            };
            let (capability, version) = (capability.trim(), version.trim());
            if capability.is_empty() || version.is_empty() {
                return Err(ErrorRecord::new(
                    ErrorKind::InitializationError,
                    format!("blank capability or version in '{segment}'"),
                )
                .with_context("config.module_versions"));
            }
            defaults.set(capability, version);
        }
        Ok(defaults)
    }
}

/// Pick the API version for a capability.
///
/// Precedence: an explicit non-blank version, then the configured default,
/// then the module's hardcoded fallback.
pub fn resolve_api_version(
    explicit: Option<&str>,
    defaults: &ModuleVersionDefaults,
    capability: &str,
    fallback: &str,
) -> String {
    explicit
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| defaults.get(capability))
        .unwrap_or(fallback)
        .to_string()
}
