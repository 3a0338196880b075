//! Easy Ship scheduling
//!
//! Handover slot lookup and scheduled package calls. Package bodies are
//! passed through as JSON.

use std::sync::Arc;

use sellerlink_common::error::ErrorResult;
use sellerlink_core::{ApiClient, HttpMethod, RequestOptions, EASY_SHIP};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{delegate_capability_module, VersionedModule};
use crate::api::ModuleClient;

/// Handover slots for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverSlots {
    /// Order the slots apply to
    pub amazon_order_id: String,
    /// Raw slot objects
    #[serde(default)]
    pub time_slots: Vec<serde_json::Value>,
}

/// Easy Ship capability
#[derive(Debug, Clone)]
pub struct EasyShipModule {
    client: ModuleClient,
}

impl EasyShipModule {
    fn path(&self, resource: &str) -> String {
        format!("/easyShip/{}/{resource}", self.client.api_version())
    }

    /// Available handover slots for an order's package
    pub async fn list_handover_slots(
        &self,
        amazon_order_id: &str,
        package_dimensions: Option<serde_json::Value>,
        package_weight: Option<serde_json::Value>,
    ) -> ErrorResult<HandoverSlots> {
        let mut body = json!({
            "marketplaceId": self.client.marketplace_id(),
            "amazonOrderId": amazon_order_id,
        });
        if let Some(dimensions) = package_dimensions {
            body["packageDimensions"] = dimensions;
        }
        if let Some(weight) = package_weight {
            body["packageWeight"] = weight;
        }
        let options = RequestOptions::new().json(body);
        self.client
            .send_json("list_handover_slots", HttpMethod::Post, &self.path("timeSlot"), options)
            .await
    }

    /// Scheduled package for an order
    pub async fn get_scheduled_package(
        &self,
        amazon_order_id: &str,
    ) -> ErrorResult<serde_json::Value> {
        let options = RequestOptions::new()
            .query("amazonOrderId", amazon_order_id)
            .query("marketplaceId", self.client.marketplace_id());
        self.client
            .send_json("get_scheduled_package", HttpMethod::Get, &self.path("package"), options)
            .await
    }

    /// Schedule a package for an order.
    pub async fn create_scheduled_package(
        &self,
        amazon_order_id: &str,
        package_details: serde_json::Value,
    ) -> ErrorResult<serde_json::Value> {
        let body = json!({
            "amazonOrderId": amazon_order_id,
            "marketplaceId": self.client.marketplace_id(),
            "packageDetails": package_details,
        });
        let options = RequestOptions::new().json(body);
        self.client
            .send_json("create_scheduled_package", HttpMethod::Post, &self.path("package"), options)
            .await
    }

    /// Update several scheduled packages at once.
    pub async fn update_scheduled_packages(
        &self,
        update_package_details_list: Vec<serde_json::Value>,
    ) -> ErrorResult<serde_json::Value> {
        let body = json!({
            "marketplaceId": self.client.marketplace_id(),
            "updatePackageDetailsList": update_package_details_list,
        });
        let path = self.path("package");
        let options = RequestOptions::new().json(body);
        self.client
            .send_json("update_scheduled_packages", HttpMethod::Patch, &path, options)
            .await
    }
}

impl VersionedModule for EasyShipModule {
    const CAPABILITY: &'static str = EASY_SHIP;
    const FALLBACK_VERSION: &'static str = "2022-03-23";

    fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self { client: ModuleClient::new(EASY_SHIP, client) }
    }
}

delegate_capability_module!(EasyShipModule);
