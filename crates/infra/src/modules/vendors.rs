//! Vendor orders
//!
//! Purchase order retrieval and acknowledgement submission for vendor
//! accounts. List calls page with `nextToken`; see
//! [`VendorsModule::get_all_purchase_orders`] for the aggregated form.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use sellerlink_common::error::ErrorResult;
use sellerlink_common::pagination::{Page, PaginationAggregator};
use sellerlink_core::{ApiClient, HttpMethod, RequestOptions, VENDORS};
use serde::{Deserialize, Serialize};

use super::{delegate_capability_module, Envelope, VersionedModule};
use crate::api::ModuleClient;

/// A purchase order as returned by the list and get calls
///
/// Only the identifying fields are typed; the rest of the order is kept
/// as raw JSON under `order_details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    /// Purchase order number
    pub purchase_order_number: String,
    /// `New`, `Acknowledged` or `Closed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_order_state: Option<String>,
    /// Raw order details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_details: Option<serde_json::Value>,
}

/// Filters for [`VendorsModule::get_purchase_orders`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseOrderQuery {
    /// Page size
    pub limit: Option<u32>,
    /// Created on or after
    pub created_after: Option<DateTime<Utc>>,
    /// Created on or before
    pub created_before: Option<DateTime<Utc>>,
    /// Order state filter
    pub purchase_order_state: Option<String>,
    /// Vendor code filter
    pub ordering_vendor_code: Option<String>,
    /// Cursor for the next page
    pub next_token: Option<String>,
}

impl PurchaseOrderQuery {
    fn to_options(&self) -> RequestOptions {
        let timestamp = |t: &DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Secs, true);
        RequestOptions::new()
            .query_opt("limit", self.limit.map(|l| l.to_string()))
            .query_opt("createdAfter", self.created_after.as_ref().map(timestamp))
            .query_opt("createdBefore", self.created_before.as_ref().map(timestamp))
            .query_opt("purchaseOrderState", self.purchase_order_state.clone())
            .query_opt("orderingVendorCode", self.ordering_vendor_code.clone())
            .query_opt("nextToken", self.next_token.clone())
    }
}

#[derive(Debug, Deserialize)]
struct OrderList {
    #[serde(default)]
    orders: Vec<PurchaseOrder>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    next_token: Option<String>,
}

/// Id of an accepted asynchronous submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionId {
    /// Transaction id
    pub transaction_id: String,
}

/// Vendor orders capability
#[derive(Debug, Clone)]
pub struct VendorsModule {
    client: ModuleClient,
}

impl VendorsModule {
    fn base(&self) -> String {
        format!("/vendor/orders/{}", self.client.api_version())
    }

    /// One page of purchase orders
    pub async fn get_purchase_orders(
        &self,
        query: &PurchaseOrderQuery,
    ) -> ErrorResult<Page<PurchaseOrder>> {
        let path = format!("{}/purchaseOrders", self.base());
        let list: Envelope<OrderList> = self
            .client
            .send_json("get_purchase_orders", HttpMethod::Get, &path, query.to_options())
            .await?;
        let next = list.payload.pagination.and_then(|p| p.next_token);
        Ok(Page::new(list.payload.orders, next))
    }

    /// Follow `nextToken` across at most `max_pages` pages
    pub async fn get_all_purchase_orders(
        &self,
        query: &PurchaseOrderQuery,
        max_pages: usize,
    ) -> ErrorResult<Vec<PurchaseOrder>> {
        PaginationAggregator::new(max_pages)
            .collect(move |cursor| {
                let page_query = PurchaseOrderQuery { next_token: cursor, ..query.clone() };
                async move { self.get_purchase_orders(&page_query).await }
            })
            .await
    }

    /// Fetch one purchase order.
    pub async fn get_purchase_order(
        &self,
        purchase_order_number: &str,
    ) -> ErrorResult<PurchaseOrder> {
        let path = format!("{}/purchaseOrders/{purchase_order_number}", self.base());
        let order: Envelope<PurchaseOrder> = self
            .client
            .send_json("get_purchase_order", HttpMethod::Get, &path, RequestOptions::new())
            .await?;
        Ok(order.payload)
    }

    /// Submit acknowledgements as given; their content is not inspected
    pub async fn submit_acknowledgement(
        &self,
        acknowledgements: Vec<serde_json::Value>,
    ) -> ErrorResult<TransactionId> {
        let path = format!("{}/acknowledgements", self.base());
        let body = serde_json::json!({ "acknowledgements": acknowledgements });
        let options = RequestOptions::new().json(body);
        let reply: Envelope<TransactionId> = self
            .client
            .send_json("submit_acknowledgement", HttpMethod::Post, &path, options)
            .await?;
        Ok(reply.payload)
    }
}

impl VersionedModule for VendorsModule {
    const CAPABILITY: &'static str = VENDORS;
    const FALLBACK_VERSION: &'static str = "v1";

    fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self { client: ModuleClient::new(VENDORS, client) }
    }
}

delegate_capability_module!(VendorsModule);
