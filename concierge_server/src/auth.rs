//! Access-token handling.
//!
//! Login and token issuance are someone else's problem: this server only *verifies* bearer tokens
//! and extracts the claims handlers act on. [`TokenIssuer`] exists for tests and operational
//! tooling, not for any route.

use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use chrono::Utc;
use concierge_engine::db_types::Role;
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The authenticated user's id.
    pub sub: i64,
    pub role: Role,
    /// Expiry as a unix timestamp. Validated on every decode.
    pub exp: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }
}

/// Pulls the bearer token out of the `Authorization` header. A bare token without the `Bearer`
/// prefix is accepted too.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
    let value = header.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value);
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

pub(crate) fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    if let Some(claims) = req.extensions().get::<JwtClaims>() {
        return Ok(claims.clone());
    }
    let verifier = req
        .app_data::<web::Data<TokenVerifier>>()
        .ok_or_else(|| ServerError::InitializeError("No token verifier is registered".to_string()))?;
    let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
    let claims = verifier.decode(&token)?;
    req.extensions_mut().insert(claims.clone());
    Ok(claims)
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req))
    }
}

/// An extractor for routes that serve both authenticated and anonymous callers. A missing or
/// invalid token yields `None` instead of a 401.
#[derive(Debug, Clone)]
pub struct OptionalClaims(pub Option<JwtClaims>);

impl FromRequest for OptionalClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalClaims(claims_from_request(req).ok())))
    }
}

//--------------------------------------   TokenVerifier    ----------------------------------------------------------
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        Self { decoding_key, validation }
    }

    pub fn decode(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("🔐️ Token failed verification. {e}");
            AuthError::ValidationError(e.to_string())
        })?;
        Ok(data.claims)
    }
}

//--------------------------------------    TokenIssuer     ----------------------------------------------------------
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    lifetime: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { encoding_key, lifetime: config.token_lifetime }
    }

    /// Issues a signed access token for the given user. The caller is responsible for having
    /// authenticated the user first.
    pub fn issue_token(&self, user_id: i64, role: Role) -> Result<String, AuthError> {
        let claims = JwtClaims { sub: user_id, role, exp: (Utc::now() + self.lifetime).timestamp() };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::ValidationError(e.to_string()))
    }
}
