use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderDetail, OrderStatus, Partner},
    order_objects::{CommissionQueryFilter, CommissionRow, ExportRecord, MonthlyCommissionRow, OrderQueryFilter},
};

#[derive(Debug, Clone, Error)]
pub enum LedgerApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order #{0} not found")]
    OrderNotFound(i64),
    #[error("Partner #{0} not found")]
    PartnerNotFound(i64),
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for LedgerApiError {
    fn from(e: sqlx::Error) -> Self {
        LedgerApiError::DatabaseError(e.to_string())
    }
}

/// The `LedgerManagement` trait defines the storage behaviour behind the order and commission
/// ledger.
///
/// Implementations persist orders with their commission snapshot, answer filtered queries joined
/// with display names, and produce the grouped commission aggregates. The commission *arithmetic*
/// does not live here; [`crate::OrderLedgerApi`] resolves partner terms before calling
/// [`LedgerManagement::insert_order`].
#[allow(async_fn_in_trait)]
pub trait LedgerManagement {
    /// A cheap connectivity check, used by the health endpoint.
    async fn ping(&self) -> Result<(), LedgerApiError>;

    /// Persists a new order with status `pending` and returns it enriched with joined display
    /// fields for immediate UI consumption.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderDetail, LedgerApiError>;

    /// Fetches a single order with joined display fields. `None` if no such order exists.
    async fn fetch_order_detail(&self, id: i64) -> Result<Option<OrderDetail>, LedgerApiError>;

    /// All orders placed by the given guest, newest first.
    async fn fetch_orders_for_guest(&self, guest_id: i64) -> Result<Vec<OrderDetail>, LedgerApiError>;

    /// Fetches orders matching the filter (all criteria AND-combined), newest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetail>, LedgerApiError>;

    /// Sets the order's status. Moving to `completed` stamps the completion time; moving to any
    /// other status clears it. Returns the updated order.
    async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, LedgerApiError>;

    /// Commission aggregates for completed orders, grouped by (partner, service type).
    async fn commission_breakdown(&self, query: CommissionQueryFilter) -> Result<Vec<CommissionRow>, LedgerApiError>;

    /// Per-partner, per-calendar-month commission aggregates for completed orders in the given
    /// year.
    async fn monthly_commissions(
        &self,
        year: i32,
        partner_id: Option<i64>,
    ) -> Result<Vec<MonthlyCommissionRow>, LedgerApiError>;

    /// The flat export projection of orders matching the filter, newest first.
    async fn export_orders(&self, query: OrderQueryFilter) -> Result<Vec<ExportRecord>, LedgerApiError>;

    /// Fetches the partner whose commission terms apply to a new order. `None` if no such partner
    /// exists.
    async fn fetch_partner(&self, id: i64) -> Result<Option<Partner>, LedgerApiError>;
}
