//! Product type definitions
//!
//! Search and schema lookup. Definitions are returned as raw JSON; the
//! schemas they reference are not fetched.

use std::sync::Arc;

use sellerlink_common::error::ErrorResult;
use sellerlink_core::{ApiClient, HttpMethod, RequestOptions, PRODUCT_TYPE_DEFINITIONS};
use serde::{Deserialize, Serialize};

use super::{delegate_capability_module, VersionedModule};
use crate::api::ModuleClient;

/// Product type search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    /// Product type name, e.g. `LUGGAGE`
    pub name: String,
    /// Localized display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Marketplaces where it is available
    #[serde(default)]
    pub marketplace_ids: Vec<String>,
}

/// Product type search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTypeList {
    /// Matching product types
    #[serde(default)]
    pub product_types: Vec<ProductType>,
    /// Version of the product type catalogue
    #[serde(default)]
    pub product_type_version: Option<String>,
}

/// Options for [`ProductTypeDefinitionsModule::get_definitions_product_type`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionQuery {
    /// Seller the definition is tailored to
    pub seller_id: Option<String>,
    /// Specific definition version
    pub product_type_version: Option<String>,
    /// `LISTING`, `LISTING_PRODUCT_ONLY` or `LISTING_OFFER_ONLY`
    pub requirements: Option<String>,
    /// `ENFORCED` or `NOT_ENFORCED`
    pub requirements_enforced: Option<String>,
    /// Locale for display labels
    pub locale: Option<String>,
}

/// Product type definitions capability
#[derive(Debug, Clone)]
pub struct ProductTypeDefinitionsModule {
    client: ModuleClient,
}

impl ProductTypeDefinitionsModule {
    fn base(&self) -> String {
        format!("/definitions/{}/productTypes", self.client.api_version())
    }

    /// Search product types by keyword, scoped to this module's marketplace
    pub async fn search_definitions_product_types(
        &self,
        keywords: &[&str],
    ) -> ErrorResult<ProductTypeList> {
        let options = RequestOptions::new()
            .query("marketplaceIds", self.client.marketplace_id())
            .query_list("keywords", keywords);
        self.client
            .send_json("search_definitions_product_types", HttpMethod::Get, &self.base(), options)
            .await
    }

    /// Schema definition for one product type.
    pub async fn get_definitions_product_type(
        &self,
        product_type: &str,
        query: &DefinitionQuery,
    ) -> ErrorResult<serde_json::Value> {
        let path = format!("{}/{product_type}", self.base());
        let options = RequestOptions::new()
            .query("marketplaceIds", self.client.marketplace_id())
            .query_opt("sellerId", query.seller_id.clone())
            .query_opt("productTypeVersion", query.product_type_version.clone())
            .query_opt("requirements", query.requirements.clone())
            .query_opt("requirementsEnforced", query.requirements_enforced.clone())
            .query_opt("locale", query.locale.clone());
        self.client.send_json("get_definitions_product_type", HttpMethod::Get, &path, options).await
    }
}

impl VersionedModule for ProductTypeDefinitionsModule {
    const CAPABILITY: &'static str = PRODUCT_TYPE_DEFINITIONS;
    const FALLBACK_VERSION: &'static str = "2020-09-01";

    fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self { client: ModuleClient::new(PRODUCT_TYPE_DEFINITIONS, client) }
    }
}

delegate_capability_module!(ProductTypeDefinitionsModule);
