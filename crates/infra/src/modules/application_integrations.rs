//! Application integration notifications

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sellerlink_common::error::ErrorResult;
use sellerlink_core::{ApiClient, HttpMethod, RequestOptions, APPLICATION_INTEGRATIONS};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{delegate_capability_module, VersionedModule};
use crate::api::ModuleClient;

/// Body of a create-notification call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    /// Template to render
    pub template_id: String,
    /// Template parameters
    pub notification_parameters: serde_json::Value,
    /// Defaults to the module marketplace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace_id: Option<String>,
    /// Expiry of the notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Reply to `create_notification`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedNotification {
    /// Id of the new notification
    pub notification_id: String,
}

/// Application integrations capability
#[derive(Debug, Clone)]
pub struct ApplicationIntegrationsModule {
    client: ModuleClient,
}

impl ApplicationIntegrationsModule {
    fn base(&self) -> String {
        format!("/appIntegrations/{}/notifications", self.client.api_version())
    }

    /// Create a notification; a missing marketplace defaults to this module's
    pub async fn create_notification(
        &self,
        mut request: NotificationRequest,
    ) -> ErrorResult<CreatedNotification> {
        if request.marketplace_id.is_none() {
            request.marketplace_id = Some(self.client.marketplace_id().to_string());
        }
        let body = serde_json::to_value(&request)?;
        let options = RequestOptions::new().json(body);
        self.client
            .send_json("create_notification", HttpMethod::Post, &self.base(), options)
            .await
    }

    /// Delete every notification sent from `template_id`.
    pub async fn delete_notifications(
        &self,
        template_id: &str,
        deletion_reason: &str,
    ) -> ErrorResult<()> {
        let path = format!("{}/deletion", self.base());
        let body = json!({ "templateId": template_id, "deletionReason": deletion_reason });
        self.client
            .send("delete_notifications", HttpMethod::Post, &path, RequestOptions::new().json(body))
            .await
            .map(|_| ())
    }

    /// Record the action a user took on a notification.
    pub async fn record_action_feedback(
        &self,
        notification_id: &str,
        feedback_action_code: &str,
    ) -> ErrorResult<()> {
        let path = format!("{}/{notification_id}/feedback", self.base());
        let body = json!({ "feedbackActionCode": feedback_action_code });
        let options = RequestOptions::new().json(body);
        self.client
            .send("record_action_feedback", HttpMethod::Post, &path, options)
            .await
            .map(|_| ())
    }
}

impl VersionedModule for ApplicationIntegrationsModule {
    const CAPABILITY: &'static str = APPLICATION_INTEGRATIONS;
    const FALLBACK_VERSION: &'static str = "2024-04-01";

    fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self { client: ModuleClient::new(APPLICATION_INTEGRATIONS, client) }
    }
}

delegate_capability_module!(ApplicationIntegrationsModule);
