use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use concierge_engine::{
    db_types::{Role, RoleStatistics, ServiceType, User},
    order_objects::CommissionRow,
    DirectoryApi,
    OrderLedgerApi,
};
use vgx_common::Money;

use super::{
    helpers::{get_request, issue_token},
    mocks::{MockDirectoryDb, MockLedgerDb},
};
use crate::routes::{AdminCommissionsRoute, AdminOrdersRoute, AdminUsersRoute};

fn configure_orders(cfg: &mut ServiceConfig) {
    let mut ledger = MockLedgerDb::new();
    ledger.expect_search_orders().returning(|_| Ok(vec![]));
    cfg.service(AdminOrdersRoute::<MockLedgerDb>::new()).app_data(web::Data::new(OrderLedgerApi::new(ledger)));
}

#[actix_web::test]
async fn hosts_can_list_admin_orders() {
    let token = issue_token(2, Role::Host);
    let (status, body) = get_request(&token, "/admin/orders?service_type=taxi&status=completed", configure_orders).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn guests_cannot_list_admin_orders() {
    let token = issue_token(1, Role::Guest);
    let (status, _) = get_request(&token, "/admin/orders", configure_orders).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unknown_filter_fields_are_rejected() {
    let token = issue_token(2, Role::Host);
    let (status, _) = get_request(&token, "/admin/orders?bogus=1", configure_orders).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn commission_row(orders: i64, revenue: i64, commission: i64) -> CommissionRow {
    CommissionRow {
        partner_id: 5,
        partner_name: "Island Taxi".to_string(),
        service_type: ServiceType::Taxi,
        total_orders: orders,
        total_revenue: Some(Money::from_cents(revenue)),
        total_commission: Money::from_cents(commission),
        avg_commission_percentage: 10.0,
    }
}

fn configure_commissions(cfg: &mut ServiceConfig) {
    let mut ledger = MockLedgerDb::new();
    ledger
        .expect_commission_breakdown()
        .returning(|_| Ok(vec![commission_row(2, 8000, 800), commission_row(1, 5000, 500)]));
    cfg.service(AdminCommissionsRoute::<MockLedgerDb>::new()).app_data(web::Data::new(OrderLedgerApi::new(ledger)));
}

#[actix_web::test]
async fn commission_totals_are_the_fold_of_the_rows() {
    let token = issue_token(4, Role::Admin);
    let (status, body) = get_request(&token, "/admin/commissions", configure_commissions).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("invalid JSON response");
    assert_eq!(json["summary"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["totals"]["total_orders"], 3);
    assert_eq!(json["totals"]["total_revenue"], 130.0);
    assert_eq!(json["totals"]["total_commission"], 13.0);
}

fn configure_users(cfg: &mut ServiceConfig) {
    let mut directory = MockDirectoryDb::new();
    directory.expect_fetch_users().returning(|role| {
        let admin = User {
            id: 4,
            email: "dave@example.com".to_string(),
            first_name: "Dave".to_string(),
            last_name: "Dunn".to_string(),
            phone: None,
            role: Role::Admin,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(),
        };
        Ok(match role {
            Some(Role::Admin) | None => vec![admin],
            _ => vec![],
        })
    });
    directory
        .expect_role_statistics()
        .returning(|| Ok(RoleStatistics { total: 5, admin: 1, host: 2, guest: 2, partner: 0 }));
    cfg.service(AdminUsersRoute::<MockDirectoryDb>::new()).app_data(web::Data::new(DirectoryApi::new(directory)));
}

#[actix_web::test]
async fn admins_get_users_with_full_table_statistics() {
    let token = issue_token(4, Role::Admin);
    let (status, body) = get_request(&token, "/admin/users?role=admin", configure_users).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("invalid JSON response");
    assert_eq!(json["users"].as_array().map(Vec::len), Some(1));
    // Statistics ignore the role filter and cover the whole table.
    assert_eq!(json["statistics"]["total"], 5);
    assert_eq!(json["statistics"]["guest"], 2);
}

#[actix_web::test]
async fn the_users_listing_is_admin_only() {
    let token = issue_token(2, Role::Host);
    let (status, _) = get_request(&token, "/admin/users", configure_users).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn an_invalid_role_filter_is_rejected() {
    let token = issue_token(4, Role::Admin);
    let (status, _) = get_request(&token, "/admin/users?role=wizard", configure_users).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
