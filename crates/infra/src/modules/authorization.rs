//! Authorization code exchange for migrated seller credentials

use std::sync::Arc;

use sellerlink_common::error::ErrorResult;
use sellerlink_core::{ApiClient, HttpMethod, RequestOptions, AUTHORIZATION};
use serde::Deserialize;

use super::{delegate_capability_module, Envelope, VersionedModule};
use crate::api::ModuleClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizationCode {
    authorization_code: String,
}

/// Authorization capability
#[derive(Debug, Clone)]
pub struct AuthorizationModule {
    client: ModuleClient,
}

impl AuthorizationModule {
    /// Fetch an authorization code for a selling partner
    pub async fn get_authorization_code(
        &self,
        selling_partner_id: &str,
        developer_id: &str,
        mws_auth_token: &str,
    ) -> ErrorResult<String> {
        let path = format!("/authorization/{}/authorizationCode", self.client.api_version());
        let options = RequestOptions::new()
            .query("sellingPartnerId", selling_partner_id)
            .query("developerId", developer_id)
            .query("mwsAuthToken", mws_auth_token);
        let reply: Envelope<AuthorizationCode> = self
            .client
            .send_json("get_authorization_code", HttpMethod::Get, &path, options)
            .await?;
        Ok(reply.payload.authorization_code)
    }
}

impl VersionedModule for AuthorizationModule {
    const CAPABILITY: &'static str = AUTHORIZATION;
    const FALLBACK_VERSION: &'static str = "v1";

    fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self { client: ModuleClient::new(AUTHORIZATION, client) }
    }
}

delegate_capability_module!(AuthorizationModule);
