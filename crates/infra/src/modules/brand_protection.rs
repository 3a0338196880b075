//! Brand protection cases
//!
//! Listing and lookup only. Case workflows belong to the caller.

use std::sync::Arc;

use sellerlink_common::error::ErrorResult;
use sellerlink_common::pagination::{Page, PaginationAggregator};
use sellerlink_core::{ApiClient, HttpMethod, RequestOptions, BRAND_PROTECTION};
use serde::{Deserialize, Serialize};

use super::{delegate_capability_module, VersionedModule};
use crate::api::ModuleClient;

/// A brand protection case, typed down to its id and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCase {
    /// Case identifier
    pub case_id: String,
    /// Case status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Remaining case fields
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaseList {
    #[serde(default)]
    cases: Vec<BrandCase>,
    next_token: Option<String>,
}

/// Brand protection capability
#[derive(Debug, Clone)]
pub struct BrandProtectionModule {
    client: ModuleClient,
}

impl BrandProtectionModule {
    fn base(&self) -> String {
        format!("/brandProtection/{}", self.client.api_version())
    }

    /// One page of cases for this module's marketplace
    pub async fn list_cases(
        &self,
        status: Option<&str>,
        next_token: Option<String>,
    ) -> ErrorResult<Page<BrandCase>> {
        let path = format!("{}/cases", self.base());
        let options = RequestOptions::new()
            .query("marketplaceIds", self.client.marketplace_id())
            .query_opt("status", status)
            .query_opt("nextToken", next_token);
        let list: CaseList =
            self.client.send_json("list_cases", HttpMethod::Get, &path, options).await?;
        Ok(Page::new(list.cases, list.next_token))
    }

    /// Follow `nextToken` across case pages, up to `max_pages`.
    pub async fn list_all_cases(
        &self,
        status: Option<&str>,
        max_pages: usize,
    ) -> ErrorResult<Vec<BrandCase>> {
        PaginationAggregator::new(max_pages)
            .collect(move |cursor| self.list_cases(status, cursor))
            .await
    }

    /// Fetch one case
    pub async fn get_case(&self, case_id: &str) -> ErrorResult<BrandCase> {
        let path = format!("{}/cases/{case_id}", self.base());
        self.client.send_json("get_case", HttpMethod::Get, &path, RequestOptions::new()).await
    }
}

impl VersionedModule for BrandProtectionModule {
    const CAPABILITY: &'static str = BRAND_PROTECTION;
    const FALLBACK_VERSION: &'static str = "v1";

    fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self { client: ModuleClient::new(BRAND_PROTECTION, client) }
    }
}

delegate_capability_module!(BrandProtectionModule);
