//! Access control middleware.
//!
//! Place this on any route or service to require one of a set of roles. The incoming bearer token
//! is verified, the claims are stashed in the request extensions for the handler's `JwtClaims`
//! extractor, and the request only proceeds if the caller's role appears in the allowed list.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use concierge_engine::db_types::Role;
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::errors::ServerError;

pub struct AclMiddlewareFactory {
    allowed_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed_roles: &[Role]) -> Self {
        AclMiddlewareFactory { allowed_roles: allowed_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { allowed_roles: self.allowed_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    allowed_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed_roles = self.allowed_roles.clone();
        Box::pin(async move {
            let claims = crate::auth::claims_from_request(req.request())?;
            if allowed_roles.contains(&claims.role) {
                req.extensions_mut().insert(claims);
                service.call(req).await
            } else {
                log::debug!("🔐️ User #{} with role {} denied; needs one of {allowed_roles:?}", claims.sub, claims.role);
                Err(ServerError::InsufficientPermissions("Insufficient permissions".to_string()).into())
            }
        })
    }
}
