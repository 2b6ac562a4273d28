use std::fmt::Debug;

use log::*;
use vgx_common::Money;

use crate::{
    db_types::{NewOrder, Order, OrderDetail, OrderStatus, Partner},
    order_objects::{
        CommissionQueryFilter,
        CommissionSummary,
        CommissionTotals,
        MonthlyCommissionRow,
        OrderExport,
        OrderQueryFilter,
    },
    traits::{LedgerApiError, LedgerManagement},
};

/// `OrderLedgerApi` is the primary API for the order and commission ledger. It resolves partner
/// commission terms when an order is created, and exposes the filtered and aggregated views the
/// admin dashboard consumes.
pub struct OrderLedgerApi<B> {
    db: B,
}

impl<B> Debug for OrderLedgerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderLedgerApi")
    }
}

impl<B> OrderLedgerApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

/// Resolves the commission recorded on a new order from the responsible partner's terms.
///
/// A percentage rate takes precedence over a fixed fee: with a price present and a positive
/// percentage, the amount is `price × percentage / 100`, rounded to the cent. Otherwise a positive
/// fixed fee applies as-is, regardless of price. With neither, or with no partner at all, the
/// commission is zero. The partner's percentage is always recorded alongside the amount.
pub fn resolve_commission(partner: Option<&Partner>, price: Option<Money>) -> (f64, Money) {
    let Some(partner) = partner else {
        return (0.0, Money::default());
    };
    let percentage = partner.commission_percentage;
    match price {
        Some(price) if percentage > 0.0 => (percentage, price.percentage(percentage)),
        _ if partner.commission_fixed.is_positive() => (percentage, partner.commission_fixed),
        _ => (percentage, Money::default()),
    }
}

impl<B> OrderLedgerApi<B>
where B: LedgerManagement
{
    /// Creates a new order on behalf of a guest.
    ///
    /// If the order names a partner, that partner's commission terms are read and the commission
    /// snapshot is computed *now*, via [`resolve_commission`]. The snapshot is never revisited:
    /// later changes to the partner's rate do not touch existing orders. The partner row itself is
    /// read without a lock, which is safe here because partner terms are read-only in this flow.
    ///
    /// The order is persisted with status `pending` and returned enriched with guest, property,
    /// partner and service display fields.
    pub async fn create_order(&self, mut order: NewOrder) -> Result<OrderDetail, LedgerApiError> {
        let partner = match order.partner_id {
            Some(partner_id) => Some(
                self.db
                    .fetch_partner(partner_id)
                    .await?
                    .ok_or(LedgerApiError::PartnerNotFound(partner_id))?,
            ),
            None => None,
        };
        let (percentage, amount) = resolve_commission(partner.as_ref(), order.price);
        order.commission_percentage = percentage;
        order.commission_amount = amount;
        let detail = self.db.insert_order(order).await?;
        debug!(
            "🧾️ Order #{} created for guest #{} with commission {} ({percentage}%)",
            detail.order.id, detail.order.guest_id, detail.order.commission_amount
        );
        Ok(detail)
    }

    /// The given guest's orders, newest first.
    pub async fn orders_for_guest(&self, guest_id: i64) -> Result<Vec<OrderDetail>, LedgerApiError> {
        self.db.fetch_orders_for_guest(guest_id).await
    }

    /// Admin view: all orders matching the filter, newest first.
    pub async fn search_orders(&self, filter: OrderQueryFilter) -> Result<Vec<OrderDetail>, LedgerApiError> {
        trace!("🧾️ Searching orders. {filter}");
        self.db.search_orders(filter).await
    }

    /// Changes the status of an order.
    ///
    /// Any status may transition to any other status; there is no state machine. Moving to
    /// `completed` stamps the completion time to now. Moving to **any** other status clears a
    /// previously recorded completion time, so an order pulled back out of `completed` drops out
    /// of the commission aggregates again.
    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, LedgerApiError> {
        let order = self.db.update_order_status(id, status).await?;
        debug!("🧾️ Order #{id} status changed to {status}");
        Ok(order)
    }

    /// The commission summary for completed orders: grouped rows plus grand totals.
    ///
    /// The totals are folded from the returned rows rather than queried separately, so the two
    /// views cannot disagree.
    pub async fn commission_summary(&self, filter: CommissionQueryFilter) -> Result<CommissionSummary, LedgerApiError> {
        let summary = self.db.commission_breakdown(filter).await?;
        let totals = CommissionTotals::fold(&summary);
        trace!(
            "🧾️ Commission summary: {} groups, {} orders, {} commission",
            summary.len(),
            totals.total_orders,
            totals.total_commission
        );
        Ok(CommissionSummary { summary, totals })
    }

    /// Per-partner monthly totals for completed orders in the given year.
    pub async fn monthly_commissions(
        &self,
        year: i32,
        partner_id: Option<i64>,
    ) -> Result<Vec<MonthlyCommissionRow>, LedgerApiError> {
        self.db.monthly_commissions(year, partner_id).await
    }

    /// The flat export projection plus export metadata.
    pub async fn export_orders(&self, filter: OrderQueryFilter) -> Result<OrderExport, LedgerApiError> {
        let records = self.db.export_orders(filter).await?;
        debug!("🧾️ Exporting {} order records", records.len());
        Ok(OrderExport::new(records))
    }

    /// Database connectivity probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), LedgerApiError> {
        self.db.ping().await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
