use std::fmt::Display;

use concierge_engine::db_types::{OrderStatus, ServiceType};
use serde::{Deserialize, Serialize};
use vgx_common::Money;

/// Request payloads are strict: unknown fields are rejected rather than silently dropped, and
/// missing required fields fail deserialization with a 400.

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewOrderRequest {
    pub property_id: i64,
    pub service_type: ServiceType,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub partner_id: Option<i64>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub order_details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMessageRequest {
    pub booking_id: i64,
    pub receiver_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewNotificationRequest {
    pub user_id: i64,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserQuery {
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonthlyCommissionQuery {
    #[serde(default)]
    pub partner_id: Option<i64>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantChatRequest {
    pub message: String,
    #[serde(default)]
    pub property_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}
