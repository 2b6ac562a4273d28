use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use concierge_engine::{
    db_types::{Booking, ChatMessage, MessageDetail, Role},
    ChatApi,
};
use mockall::predicate::eq;

use super::{
    helpers::{get_request, issue_token, post_request},
    mocks::MockChatDb,
};
use crate::routes::{BookingMessagesRoute, SendMessageRoute};

fn booking() -> Booking {
    Booking { id: 7, guest_id: 1, property_id: 1, created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() }
}

fn message_detail(id: i64, receiver_id: i64, is_read: bool) -> MessageDetail {
    MessageDetail {
        message: ChatMessage {
            id,
            booking_id: 7,
            sender_id: 1,
            receiver_id,
            message: "Hi".to_string(),
            is_read,
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 10, 15, 0).unwrap(),
        },
        sender_first_name: "Alice".to_string(),
        sender_last_name: "Archer".to_string(),
        sender_role: Role::Guest,
    }
}

fn configure_send_allowed(cfg: &mut ServiceConfig) {
    let mut chat = MockChatDb::new();
    chat.expect_fetch_booking_for_user().with(eq(7), eq(1)).returning(|_, _| Ok(Some(booking())));
    chat.expect_insert_message()
        .withf(|m| m.booking_id == 7 && m.sender_id == 1 && m.receiver_id == 3 && m.message == "Hi")
        .returning(|m| Ok(message_detail(1, m.receiver_id, false)));
    cfg.service(SendMessageRoute::<MockChatDb>::new()).app_data(web::Data::new(ChatApi::new(chat)));
}

#[actix_web::test]
async fn guest_can_persist_a_message() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({"booking_id": 7, "receiver_id": 3, "message": "Hi"});
    let (status, body) = post_request(&token, "/chat", body, configure_send_allowed).await;
    assert_eq!(status, StatusCode::CREATED);
    let json: serde_json::Value = serde_json::from_str(&body).expect("invalid JSON response");
    assert_eq!(json["message"], "Hi");
    assert_eq!(json["sender_first_name"], "Alice");
    assert_eq!(json["is_read"], false);
}

#[actix_web::test]
async fn empty_messages_are_rejected() {
    let token = issue_token(1, Role::Guest);
    let body = serde_json::json!({"booking_id": 7, "receiver_id": 3, "message": "   "});
    let (status, _) = post_request(&token, "/chat", body, configure_send_allowed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure_denied(cfg: &mut ServiceConfig) {
    let mut chat = MockChatDb::new();
    chat.expect_fetch_booking_for_user().returning(|_, _| Ok(None));
    cfg.service(SendMessageRoute::<MockChatDb>::new())
        .service(BookingMessagesRoute::<MockChatDb>::new())
        .app_data(web::Data::new(ChatApi::new(chat)));
}

// Denied access reads as 404, so a prober cannot confirm the booking exists.
#[actix_web::test]
async fn outsiders_get_not_found_on_both_operations() {
    let token = issue_token(5, Role::Guest);
    let body = serde_json::json!({"booking_id": 7, "receiver_id": 3, "message": "hello?"});
    let (status, _) = post_request(&token, "/chat", body, configure_denied).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_request(&token, "/chat/booking/7", configure_denied).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn configure_fetch(cfg: &mut ServiceConfig) {
    let mut chat = MockChatDb::new();
    chat.expect_fetch_booking_for_user().with(eq(7), eq(3)).returning(|_, _| Ok(Some(booking())));
    // The fetch marks the requester's messages read before reading the rows back.
    chat.expect_mark_messages_read().with(eq(7), eq(3)).returning(|_, _| Ok(1));
    chat.expect_fetch_messages()
        .with(eq(7))
        .returning(|_| Ok(vec![message_detail(1, 3, true), message_detail(2, 1, false)]));
    cfg.service(BookingMessagesRoute::<MockChatDb>::new()).app_data(web::Data::new(ChatApi::new(chat)));
}

#[actix_web::test]
async fn fetching_returns_the_conversation_with_read_receipts_applied() {
    let token = issue_token(3, Role::Host);
    let (status, body) = get_request(&token, "/chat/booking/7", configure_fetch).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("invalid JSON response");
    assert_eq!(json.as_array().map(Vec::len), Some(2));
    // The host-addressed message is read; the guest-addressed one is untouched.
    assert_eq!(json[0]["receiver_id"], 3);
    assert_eq!(json[0]["is_read"], true);
    assert_eq!(json[1]["receiver_id"], 1);
    assert_eq!(json[1]["is_read"], false);
}

#[actix_web::test]
async fn fetching_requires_a_token() {
    let (status, _) = get_request("", "/chat/booking/7", configure_fetch).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
