use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use concierge_engine::{
    db_types::{Json, NewOrder, Order, OrderDetail, OrderStatus, Partner, Role, ServiceType},
    OrderLedgerApi,
};
use vgx_common::Money;

use super::{
    helpers::{get_request, issue_token, patch_request, post_request},
    mocks::MockLedgerDb,
};
use crate::routes::{CreateOrderRoute, MyOrdersRoute, UpdateOrderStatusRoute};

fn taxi_partner() -> Partner {
    Partner {
        id: 5,
        name: "Island Taxi".to_string(),
        email: None,
        phone: None,
        description: None,
        service_type: ServiceType::Taxi,
        commission_percentage: 10.0,
        commission_fixed: Money::from_cents(0),
        is_active: true,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

fn detail_from(order: NewOrder) -> OrderDetail {
    OrderDetail {
        order: Order {
            id: 1,
            guest_id: order.guest_id,
            property_id: order.property_id,
            service_id: order.service_id,
            partner_id: order.partner_id,
            service_type: order.service_type,
            price: order.price,
            commission_percentage: order.commission_percentage,
            commission_amount: order.commission_amount,
            order_details: order.order_details.map(Json),
            status: OrderStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
            completed_at: None,
        },
        guest_first_name: Some("Alice".to_string()),
        guest_last_name: Some("Archer".to_string()),
        guest_email: Some("alice@example.com".to_string()),
        property_name: Some("Seaview Villa".to_string()),
        partner_name: order.partner_id.map(|_| "Island Taxi".to_string()),
        service_name: None,
    }
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut ledger = MockLedgerDb::new();
    ledger.expect_fetch_partner().returning(|id| if id == 5 { Ok(Some(taxi_partner())) } else { Ok(None) });
    ledger
        .expect_insert_order()
        .withf(|order| order.commission_percentage == 10.0 && order.commission_amount == Money::from_cents(500))
        .returning(|order| Ok(detail_from(order)));
    cfg.service(CreateOrderRoute::<MockLedgerDb>::new()).app_data(web::Data::new(OrderLedgerApi::new(ledger)));
}

#[actix_web::test]
async fn create_order_snapshots_the_commission() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({
        "property_id": 1,
        "service_type": "taxi",
        "partner_id": 5,
        "price": 50.0,
        "order_details": {"pickup": "08:30"}
    });
    let (status, body) = post_request(&token, "/orders", body, configure_create).await;
    assert_eq!(status, StatusCode::CREATED);
    let json: serde_json::Value = serde_json::from_str(&body).expect("invalid JSON response");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["commission_amount"], 5.0);
    assert_eq!(json["commission_percentage"], 10.0);
    assert_eq!(json["partner_name"], "Island Taxi");
    assert_eq!(json["guest_email"], "alice@example.com");
}

#[actix_web::test]
async fn create_order_requires_a_token() {
    let body = serde_json::json!({"property_id": 1, "service_type": "taxi"});
    let (status, _) = post_request("", "/orders", body, configure_create).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_order_rejects_unknown_service_types() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({"property_id": 1, "service_type": "massage"});
    let (status, _) = post_request(&token, "/orders", body, configure_create).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_order_rejects_unknown_fields() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({"property_id": 1, "service_type": "taxi", "admin": true});
    let (status, _) = post_request(&token, "/orders", body, configure_create).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_order_with_unknown_partner_is_not_found() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({"property_id": 1, "service_type": "taxi", "partner_id": 999});
    let (status, _) = post_request(&token, "/orders", body, configure_create).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn configure_my_orders(cfg: &mut ServiceConfig) {
    let mut ledger = MockLedgerDb::new();
    ledger.expect_fetch_orders_for_guest().returning(|guest_id| {
        let mut order = NewOrder::new(guest_id, 1, ServiceType::Cleaning);
        order.price = Some(Money::from_cents(8000));
        Ok(vec![detail_from(order)])
    });
    cfg.service(MyOrdersRoute::<MockLedgerDb>::new()).app_data(web::Data::new(OrderLedgerApi::new(ledger)));
}

#[actix_web::test]
async fn my_orders_are_scoped_to_the_caller() {
    let token = issue_token(42, Role::Guest);
    let (status, body) = get_request(&token, "/orders/my-orders", configure_my_orders).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("invalid JSON response");
    assert_eq!(json[0]["guest_id"], 42);
}

fn configure_status(cfg: &mut ServiceConfig) {
    let mut ledger = MockLedgerDb::new();
    ledger.expect_update_order_status().returning(|id, status| {
        let mut order = detail_from(NewOrder::new(1, 1, ServiceType::Taxi)).order;
        order.id = id;
        order.status = status;
        order.completed_at = (status == OrderStatus::Completed).then(Utc::now);
        Ok(order)
    });
    cfg.service(UpdateOrderStatusRoute::<MockLedgerDb>::new())
        .app_data(web::Data::new(OrderLedgerApi::new(ledger)));
}

#[actix_web::test]
async fn status_update_acknowledges_the_new_status() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({"status": "completed"});
    let (status, body) = patch_request(&token, "/orders/7/status", body, configure_status).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("invalid JSON response");
    assert_eq!(json["message"], "Order status updated");
    assert_eq!(json["status"], "completed");
}

#[actix_web::test]
async fn status_update_rejects_invalid_statuses() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({"status": "done"});
    let (status, _) = patch_request(&token, "/orders/7/status", body, configure_status).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
