use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vgx_common::Money;

use crate::db_types::{OrderStatus, ServiceType};

//--------------------------------------  OrderQueryFilter  ----------------------------------------------------------
/// The filter criteria accepted by the admin order list and export endpoints. All criteria are
/// optional and AND-combined. Date bounds compare against the *calendar date* of `created_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderQueryFilter {
    pub partner_id: Option<i64>,
    pub service_type: Option<ServiceType>,
    pub status: Option<OrderStatus>,
    #[serde(rename = "start_date")]
    pub since: Option<NaiveDate>,
    #[serde(rename = "end_date")]
    pub until: Option<NaiveDate>,
}

impl OrderQueryFilter {
    pub fn with_partner(mut self, partner_id: i64) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = Some(service_type);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.since = Some(date);
        self
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.until = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.partner_id.is_none() &&
            self.service_type.is_none() &&
            self.status.is_none() &&
            self.since.is_none() &&
            self.until.is_none()
    }
}

impl Display for OrderQueryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "No filters.")?;
            return Ok(());
        }
        if let Some(partner_id) = self.partner_id {
            write!(f, "partner: {partner_id}. ")?;
        }
        if let Some(service_type) = self.service_type {
            write!(f, "service_type: {service_type}. ")?;
        }
        if let Some(status) = self.status {
            write!(f, "status: {status}. ")?;
        }
        if let Some(since) = self.since {
            write!(f, "since {since}. ")?;
        }
        if let Some(until) = self.until {
            write!(f, "until {until}. ")?;
        }
        Ok(())
    }
}

//------------------------------------ CommissionQueryFilter ---------------------------------------------------------
/// Filter for the commission summary. Date bounds compare against the calendar date of
/// `completed_at`, since only completed orders are included.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommissionQueryFilter {
    pub partner_id: Option<i64>,
    #[serde(rename = "start_date")]
    pub since: Option<NaiveDate>,
    #[serde(rename = "end_date")]
    pub until: Option<NaiveDate>,
}

impl CommissionQueryFilter {
    pub fn with_partner(mut self, partner_id: i64) -> Self {
        self.partner_id = Some(partner_id);
        self
    }
}

//--------------------------------------  ServiceQueryFilter  --------------------------------------------------------
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceQueryFilter {
    #[serde(rename = "type")]
    pub service_type: Option<ServiceType>,
    pub partner_id: Option<i64>,
}

//--------------------------------------   Commission rows   ---------------------------------------------------------
/// One (partner, service type) group of the commission summary.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommissionRow {
    pub partner_id: i64,
    pub partner_name: String,
    pub service_type: ServiceType,
    pub total_orders: i64,
    /// Sum of order prices in the group. `None` when every order in the group has no price.
    pub total_revenue: Option<Money>,
    pub total_commission: Money,
    pub avg_commission_percentage: f64,
}

/// Grand totals across all returned groups.
///
/// These are folded from the grouped rows on the caller side rather than computed by a second
/// database aggregate, so row totals and grand totals agree by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommissionTotals {
    pub total_orders: i64,
    pub total_revenue: Money,
    pub total_commission: Money,
}

impl CommissionTotals {
    pub fn fold(rows: &[CommissionRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.total_orders += row.total_orders;
            acc.total_revenue += row.total_revenue.unwrap_or_default();
            acc.total_commission += row.total_commission;
            acc
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommissionSummary {
    pub summary: Vec<CommissionRow>,
    pub totals: CommissionTotals,
}

/// One (partner, month) row of the monthly commission report.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyCommissionRow {
    pub partner_id: i64,
    pub partner_name: String,
    pub month: i64,
    pub order_count: i64,
    pub revenue: Option<Money>,
    pub commission: Money,
}

//--------------------------------------      Export        ----------------------------------------------------------
/// The flat, join-resolved projection handed to the export collaborator. CSV serialization itself
/// happens outside this crate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExportRecord {
    pub id: i64,
    pub order_date: DateTime<Utc>,
    pub guest_first_name: Option<String>,
    pub guest_last_name: Option<String>,
    pub guest_email: Option<String>,
    pub property_name: Option<String>,
    pub partner_name: Option<String>,
    pub service_name: Option<String>,
    pub service_type: ServiceType,
    pub status: OrderStatus,
    pub price: Option<Money>,
    pub commission_percentage: f64,
    pub commission_amount: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderExport {
    pub data: Vec<ExportRecord>,
    pub export_date: DateTime<Utc>,
    pub total_records: usize,
}

impl OrderExport {
    pub fn new(data: Vec<ExportRecord>) -> Self {
        let total_records = data.len();
        Self { data, export_date: Utc::now(), total_records }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row(orders: i64, revenue: Option<i64>, commission: i64) -> CommissionRow {
        CommissionRow {
            partner_id: 1,
            partner_name: "Island Taxi".to_string(),
            service_type: ServiceType::Taxi,
            total_orders: orders,
            total_revenue: revenue.map(Money::from_cents),
            total_commission: Money::from_cents(commission),
            avg_commission_percentage: 10.0,
        }
    }

    #[test]
    fn totals_are_the_fold_of_the_rows() {
        let rows = vec![row(3, Some(15_000), 1500), row(2, Some(8_000), 400), row(1, None, 250)];
        let totals = CommissionTotals::fold(&rows);
        assert_eq!(totals.total_orders, rows.iter().map(|r| r.total_orders).sum::<i64>());
        assert_eq!(totals.total_revenue, Money::from_cents(23_000));
        assert_eq!(totals.total_commission, Money::from_cents(2150));
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(CommissionTotals::fold(&[]), CommissionTotals::default());
    }

    #[test]
    fn filter_display_and_is_empty() {
        let filter = OrderQueryFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.to_string(), "No filters.");
        let filter = filter.with_partner(5).with_status(OrderStatus::Completed);
        assert!(!filter.is_empty());
        assert_eq!(filter.to_string(), "partner: 5. status: completed. ");
    }

    #[test]
    fn filter_rejects_unknown_query_fields() {
        let err = serde_json::from_str::<OrderQueryFilter>(r#"{"partner_id":1,"bogus":2}"#);
        assert!(err.is_err());
    }

    #[test]
    fn export_counts_its_records() {
        let export = OrderExport::new(vec![]);
        assert_eq!(export.total_records, 0);
    }
}
