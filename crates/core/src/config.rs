//! Connection configuration model
//!
//! Loading (env vars, `.env`, TOML/JSON files) lives in the infra crate;
//! this is only the shape and its validation.

use sellerlink_common::error::{ErrorKind, ErrorRecord, ErrorResult};
use sellerlink_common::resilience::BatchConfig;
use serde::{Deserialize, Serialize};

use crate::modules::versions::ModuleVersionDefaults;

/// Settings for one marketplace connection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionConfig {
    /// Marketplace every module talks to
    pub marketplace_id: String,

    /// Default API version per capability name
    pub module_versions: ModuleVersionDefaults,

    /// Batch execution settings
    pub batch: BatchConfig,
}

impl ConnectionConfig {
    /// Defaults for everything but the marketplace
    pub fn new(marketplace_id: impl Into<String>) -> Self {
        Self { marketplace_id: marketplace_id.into(), ..Self::default() }
    }

    /// Set the default version for one capability
    pub fn with_module_version(
        mut self,
        capability: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.module_versions.set(capability, version);
        self
    }

    /// Replace the batch settings
    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// # Errors
    ///
    /// `InitializationError` (context `connection_config.validate`) for a
    /// blank marketplace id; batch settings are checked by
    /// [`BatchConfig::validate`].
    pub fn validate(&self) -> ErrorResult<()> {
        if self.marketplace_id.trim().is_empty() {
            return Err(ErrorRecord::new(
                ErrorKind::InitializationError,
                "marketplace id must not be empty",
            )
            .with_context("connection_config.validate"));
        }
        self.batch.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    /// Validates camelCase decoding with batch defaults filled in.
    ///
    /// Assertions:
    /// - Omitted batch fields take their defaults.
    /// - Module versions decode from a plain object.
    #[test]
    fn test_deserialize_partial() {
        let config: ConnectionConfig = serde_json::from_value(json!({
            "marketplaceId": "ATVPDKIKX0DER",
            "moduleVersions": {"easyShip": "2022-03-23"},
            "batch": {"batchSize": 5, "delayBetweenBatchesMs": 0}
        }))
        .unwrap();

        assert_eq!(config.marketplace_id, "ATVPDKIKX0DER");
        assert_eq!(config.module_versions.get("easyShip"), Some("2022-03-23"));
        assert_eq!(config.batch.batch_size, 5);
        assert_eq!(config.batch.delay_between_batches, Duration::ZERO);
        assert_eq!(config.batch.max_retries, BatchConfig::default().max_retries);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_marketplace() {
        let err = ConnectionConfig::default().validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);
        assert_eq!(err.context(), "connection_config.validate");
    }

    #[test]
    fn test_validate_checks_batch() {
        let mut batch = BatchConfig::default();
        batch.batch_size = 0;
        let err = ConnectionConfig::new("MP").with_batch(batch).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);
        assert_eq!(err.context(), "batch_config.validate");
    }
}
