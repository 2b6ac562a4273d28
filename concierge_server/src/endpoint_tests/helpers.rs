use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App, HttpResponse};
use concierge_engine::db_types::Role;

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::AuthConfig,
};

// A fixed signing config for endpoint tests. DO NOT re-use this secret anywhere.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig::new("endpoint-test-secret-0451")
}

pub fn issue_token(user_id: i64, role: Role) -> String {
    TokenIssuer::new(&test_auth_config()).issue_token(user_id, role).expect("Failed to sign token")
}

async fn send_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let verifier = TokenVerifier::new(&test_auth_config());
    let app = App::new().app_data(web::Data::new(verifier)).configure(configure);
    let service = test::init_service(app).await;
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        // Middleware-level failures surface as bare errors; render them the way the server would.
        Err(e) => {
            let res = HttpResponse::from_error(e);
            let status = res.status();
            let body = actix_web::body::to_bytes(res.into_body()).await.unwrap_or_default();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

fn with_auth(req: TestRequest, token: &str) -> TestRequest {
    if token.is_empty() {
        req
    } else {
        req.insert_header(("Authorization", format!("Bearer {token}")))
    }
}

pub async fn get_request(token: &str, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    send_request(with_auth(TestRequest::get().uri(path), token), configure).await
}

pub async fn post_request(
    token: &str,
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    send_request(with_auth(TestRequest::post().uri(path).set_json(body), token), configure).await
}

pub async fn patch_request(
    token: &str,
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    send_request(with_auth(TestRequest::patch().uri(path).set_json(body), token), configure).await
}
