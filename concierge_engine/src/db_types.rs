use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
pub use sqlx::types::Json;
use sqlx::{FromRow, Type};
use thiserror::Error;
use vgx_common::Money;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------    ServiceType     ----------------------------------------------------------
/// The fixed set of guest services that can be ordered through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    FoodDelivery,
    Taxi,
    Excursion,
    Cleaning,
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::FoodDelivery => write!(f, "food_delivery"),
            ServiceType::Taxi => write!(f, "taxi"),
            ServiceType::Excursion => write!(f, "excursion"),
            ServiceType::Cleaning => write!(f, "cleaning"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food_delivery" => Ok(Self::FoodDelivery),
            "taxi" => Ok(Self::Taxi),
            "excursion" => Ok(Self::Excursion),
            "cleaning" => Ok(Self::Cleaning),
            s => Err(ConversionError(format!("Invalid service type: {s}"))),
        }
    }
}

//--------------------------------------    OrderStatus     ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// The order has been created and no one has acted on it yet.
    Pending,
    /// The responsible partner has accepted the order.
    Confirmed,
    /// The service is being carried out.
    InProgress,
    /// The service was delivered. Only completed orders enter commission reporting.
    Completed,
    /// The order was called off by the guest or an admin.
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Confirmed => write!(f, "confirmed"),
            OrderStatus::InProgress => write!(f, "in_progress"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Role        ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Host,
    Guest,
    Partner,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Host => write!(f, "host"),
            Role::Guest => write!(f, "guest"),
            Role::Partner => write!(f, "partner"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "host" => Ok(Self::Host),
            "guest" => Ok(Self::Guest),
            "partner" => Ok(Self::Partner),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------       Order        ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub guest_id: i64,
    pub property_id: i64,
    pub service_id: Option<i64>,
    pub partner_id: Option<i64>,
    pub service_type: ServiceType,
    pub price: Option<Money>,
    /// The partner's percentage rate as it stood when the order was created.
    pub commission_percentage: f64,
    /// The commission owed on this order, fixed at creation time. Never recomputed, even if the
    /// partner's terms change afterwards.
    pub commission_amount: Money,
    pub order_details: Option<Json<serde_json::Value>>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// An order joined with the display names the admin UI and order confirmations need.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub guest_first_name: Option<String>,
    pub guest_last_name: Option<String>,
    pub guest_email: Option<String>,
    pub property_name: Option<String>,
    pub partner_name: Option<String>,
    pub service_name: Option<String>,
}

//--------------------------------------      NewOrder      ----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub guest_id: i64,
    pub property_id: i64,
    pub service_id: Option<i64>,
    pub partner_id: Option<i64>,
    pub service_type: ServiceType,
    pub price: Option<Money>,
    /// Set by the ledger when the order is created. Values supplied by callers are overwritten.
    pub commission_percentage: f64,
    pub commission_amount: Money,
    /// Opaque, client-defined payload describing the request (delivery address, pickup time, etc).
    pub order_details: Option<serde_json::Value>,
}

impl NewOrder {
    pub fn new(guest_id: i64, property_id: i64, service_type: ServiceType) -> Self {
        Self {
            guest_id,
            property_id,
            service_id: None,
            partner_id: None,
            service_type,
            price: None,
            commission_percentage: 0.0,
            commission_amount: Money::default(),
            order_details: None,
        }
    }

    pub fn with_partner(mut self, partner_id: i64) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_service(mut self, service_id: i64) -> Self {
        self.service_id = Some(service_id);
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.order_details = Some(details);
        self
    }
}

//--------------------------------------      Partner       ----------------------------------------------------------
/// A service provider and its commission policy. Read-only from the ledger's perspective: the
/// engine never writes partner rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub commission_percentage: f64,
    pub commission_fixed: Money,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Service       ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: i64,
    pub partner_id: Option<i64>,
    pub name: String,
    pub service_type: ServiceType,
    pub description: Option<String>,
    pub price: Option<Money>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub service: Service,
    pub partner_name: Option<String>,
    pub partner_phone: Option<String>,
    pub partner_email: Option<String>,
    pub partner_description: Option<String>,
}

//--------------------------------------      Booking       ----------------------------------------------------------
/// The reservation context that scopes chat access control.
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: i64,
    pub guest_id: i64,
    pub property_id: i64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    ChatMessage     ----------------------------------------------------------
/// One chat line. Immutable once written, except for the read flag, which flips when the
/// receiving party fetches the conversation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: i64,
    pub booking_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub message: ChatMessage,
    pub sender_first_name: String,
    pub sender_last_name: String,
    pub sender_role: Role,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub booking_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub message: String,
}

//--------------------------------------    Notification    ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: String,
    pub title: String,
    pub message: String,
}

//--------------------------------------        User        ----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Per-role user counts, always computed over the full user table regardless of any list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleStatistics {
    pub total: i64,
    pub admin: i64,
    pub host: i64,
    pub guest: i64,
    pub partner: i64,
}

impl RoleStatistics {
    pub fn from_counts(total: i64, counts: &[(Role, i64)]) -> Self {
        let mut stats = Self { total, ..Self::default() };
        for (role, count) in counts {
            match role {
                Role::Admin => stats.admin = *count,
                Role::Host => stats.host = *count,
                Role::Guest => stats.guest = *count,
                Role::Partner => stats.partner = *count,
            }
        }
        stats
    }
}

//--------------------------------------      Property      ----------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct PropertyLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct PropertyContext {
    pub name: String,
    pub address: Option<String>,
}

impl PropertyContext {
    /// A single context string for the assistant provider.
    pub fn as_prompt_context(&self) -> String {
        match &self.address {
            Some(address) => format!("The guest is staying at {}, located at {address}.", self.name),
            None => format!("The guest is staying at {}.", self.name),
        }
    }
}
