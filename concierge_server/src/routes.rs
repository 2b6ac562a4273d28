//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (I/O, database
//! calls, outbound provider calls) must be awaited rather than blocked on, so worker threads can interleave other
//! requests.

use actix_web::{get, web, HttpResponse, Responder};
use chrono::{Datelike, Utc};
use concierge_engine::{
    db_types::{NewNotification, NewOrder, Role},
    order_objects::{CommissionQueryFilter, OrderQueryFilter, ServiceQueryFilter},
    traits::{ChatManagement, DirectoryManagement, LedgerManagement, NotificationManagement},
    ChatApi,
    DirectoryApi,
    NotificationApi,
    OrderLedgerApi,
};
use log::*;

use crate::{
    auth::{JwtClaims, OptionalClaims},
    data_objects::{
        AssistantChatRequest,
        AssistantChatResponse,
        JsonResponse,
        MonthlyCommissionQuery,
        NewMessageRequest,
        NewNotificationRequest,
        NewOrderRequest,
        NotificationQuery,
        UpdateStatusRequest,
        UserQuery,
    },
    errors::ServerError,
    integrations::{AssistantApi, WeatherApi},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:expr),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

route!(health_db => Get "/health/db" impl LedgerManagement);
pub async fn health_db<B: LedgerManagement>(api: web::Data<OrderLedgerApi<B>>) -> Result<HttpResponse, ServerError> {
    api.ping().await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Database connected")))
}

//----------------------------------------------   Orders  -----------------------------------------------------------
route!(create_order => Post "/orders" impl LedgerManagement);
/// Creates a service order on behalf of the authenticated guest.
///
/// The commission snapshot is resolved inside the ledger from the named partner's terms; the
/// response is the stored order enriched with guest/property/partner/service display fields, so
/// the client can render it without further lookups.
pub async fn create_order<B: LedgerManagement>(
    claims: JwtClaims,
    api: web::Data<OrderLedgerApi<B>>,
    body: web::Json<NewOrderRequest>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST order from guest #{} for property #{}", claims.user_id(), req.property_id);
    let mut order = NewOrder::new(claims.user_id(), req.property_id, req.service_type);
    order.service_id = req.service_id;
    order.partner_id = req.partner_id;
    order.price = req.price;
    order.order_details = req.order_details;
    let detail = api.create_order(order).await?;
    Ok(HttpResponse::Created().json(detail))
}

route!(my_orders => Get "/orders/my-orders" impl LedgerManagement);
pub async fn my_orders<B: LedgerManagement>(
    claims: JwtClaims,
    api: web::Data<OrderLedgerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my orders for user #{}", claims.user_id());
    let orders = api.orders_for_guest(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(update_order_status => Patch "/orders/{id}/status" impl LedgerManagement);
/// Transitions an order to a new status. There is no transition table: any status can move to any
/// other. Completing stamps the completion time; every other target status clears it.
pub async fn update_order_status<B: LedgerManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<OrderLedgerApi<B>>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let status = body.into_inner().status;
    debug!("💻️ PATCH order #{id} to {status} by user #{}", claims.user_id());
    api.update_order_status(id, status).await?;
    Ok(HttpResponse::Ok()
        .json(crate::data_objects::StatusUpdateResponse { message: "Order status updated".to_string(), status }))
}

//----------------------------------------------   Admin   -----------------------------------------------------------
route!(admin_orders => Get "/admin/orders" impl LedgerManagement where requires [Role::Admin, Role::Host]);
pub async fn admin_orders<A: LedgerManagement>(
    query: web::Query<OrderQueryFilter>,
    api: web::Data<OrderLedgerApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let filter = query.into_inner();
    debug!("💻️ GET admin orders. {filter}");
    let orders = api.search_orders(filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(admin_commissions => Get "/admin/commissions" impl LedgerManagement where requires [Role::Admin, Role::Host]);
pub async fn admin_commissions<A: LedgerManagement>(
    query: web::Query<CommissionQueryFilter>,
    api: web::Data<OrderLedgerApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let summary = api.commission_summary(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(admin_monthly_commissions => Get "/admin/commissions/monthly" impl LedgerManagement where requires [Role::Admin, Role::Host]);
pub async fn admin_monthly_commissions<A: LedgerManagement>(
    query: web::Query<MonthlyCommissionQuery>,
    api: web::Data<OrderLedgerApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let query = query.into_inner();
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let rows = api.monthly_commissions(year, query.partner_id).await?;
    Ok(HttpResponse::Ok().json(rows))
}

route!(admin_export_orders => Get "/admin/orders/export" impl LedgerManagement where requires [Role::Admin, Role::Host]);
/// The flat export rows plus export metadata. Serializing to CSV is the caller's concern.
pub async fn admin_export_orders<A: LedgerManagement>(
    query: web::Query<OrderQueryFilter>,
    api: web::Data<OrderLedgerApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let export = api.export_orders(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(export))
}

route!(admin_users => Get "/admin/users" impl DirectoryManagement where requires [Role::Admin]);
pub async fn admin_users<A: DirectoryManagement>(
    query: web::Query<UserQuery>,
    api: web::Data<DirectoryApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let role = match query.into_inner().role.as_deref() {
        None | Some("all") => None,
        Some(r) => {
            Some(r.parse::<Role>().map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?)
        },
    };
    let report = api.users_with_statistics(role).await?;
    Ok(HttpResponse::Ok().json(report))
}

//----------------------------------------------    Chat   -----------------------------------------------------------
route!(send_message => Post "/chat" impl ChatManagement);
/// Persists a chat message. This is independent of the socket relay: clients broadcast separately
/// after this call returns, and nothing guarantees the two stay in lockstep. The stored log wins.
pub async fn send_message<B: ChatManagement>(
    claims: JwtClaims,
    api: web::Data<ChatApi<B>>,
    body: web::Json<NewMessageRequest>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    if req.message.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("Message text is required".to_string()));
    }
    let detail = api.post_message(claims.user_id(), req.booking_id, req.receiver_id, req.message).await?;
    Ok(HttpResponse::Created().json(detail))
}

route!(booking_messages => Get "/chat/booking/{booking_id}" impl ChatManagement);
/// The booking's conversation, oldest first. Fetching doubles as the read receipt for every
/// message addressed to the caller.
pub async fn booking_messages<B: ChatManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<ChatApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let booking_id = path.into_inner();
    debug!("💻️ GET messages for booking #{booking_id} by user #{}", claims.user_id());
    let messages = api.conversation(booking_id, claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

//----------------------------------------------  Services  ----------------------------------------------------------
route!(list_services => Get "/services" impl DirectoryManagement);
pub async fn list_services<B: DirectoryManagement>(
    _claims: JwtClaims,
    query: web::Query<ServiceQueryFilter>,
    api: web::Data<DirectoryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let services = api.services(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(services))
}

route!(list_partners => Get "/services/partners" impl DirectoryManagement);
pub async fn list_partners<B: DirectoryManagement>(
    _claims: JwtClaims,
    query: web::Query<ServiceQueryFilter>,
    api: web::Data<DirectoryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let partners = api.partners(query.into_inner().service_type).await?;
    Ok(HttpResponse::Ok().json(partners))
}

route!(get_service => Get "/services/{id}" impl DirectoryManagement);
pub async fn get_service<B: DirectoryManagement>(
    _claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<DirectoryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let service = api.service(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(service))
}

//--------------------------------------------- Notifications --------------------------------------------------------
route!(create_notification => Post "/notifications" impl NotificationManagement);
pub async fn create_notification<B: NotificationManagement>(
    _claims: JwtClaims,
    api: web::Data<NotificationApi<B>>,
    body: web::Json<NewNotificationRequest>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    let notification = NewNotification {
        user_id: req.user_id,
        notification_type: req.notification_type,
        title: req.title,
        message: req.message,
    };
    let stored = api.create(notification).await?;
    Ok(HttpResponse::Created().json(stored))
}

route!(my_notifications => Get "/notifications/my-notifications" impl NotificationManagement);
pub async fn my_notifications<B: NotificationManagement>(
    claims: JwtClaims,
    query: web::Query<NotificationQuery>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let unread_only = query.into_inner().unread_only.unwrap_or(false);
    let notifications = api.for_user(claims.user_id(), unread_only).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

route!(mark_all_notifications_read => Patch "/notifications/read-all" impl NotificationManagement);
pub async fn mark_all_notifications_read<B: NotificationManagement>(
    claims: JwtClaims,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    api.mark_all_read(claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("All notifications marked as read")))
}

route!(mark_notification_read => Patch "/notifications/{id}/read" impl NotificationManagement);
pub async fn mark_notification_read<B: NotificationManagement>(
    claims: JwtClaims,
    path: web::Path<i64>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    api.mark_read(path.into_inner(), claims.user_id()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Notification marked as read")))
}

//----------------------------------------------  Assistant ----------------------------------------------------------
route!(assistant_chat => Post "/ai-assistant/chat" impl DirectoryManagement);
/// Forwards a guest question to the chat-completion provider, with the property context resolved
/// from the directory when a property id is supplied. Anonymous callers are allowed.
pub async fn assistant_chat<B: DirectoryManagement>(
    maybe_claims: OptionalClaims,
    directory: web::Data<DirectoryApi<B>>,
    assistant: web::Data<AssistantApi>,
    body: web::Json<AssistantChatRequest>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    if req.message.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("Message is required".to_string()));
    }
    let context = match req.property_id {
        Some(property_id) => directory.property_context(property_id).await?.map(|c| c.as_prompt_context()),
        None => None,
    };
    trace!("🤖️ Assistant request from user {:?}", maybe_claims.0.as_ref().map(|c| c.user_id()));
    let reply = assistant.chat(&req.message, context.as_deref()).await?;
    Ok(HttpResponse::Ok().json(AssistantChatResponse { response: reply }))
}

//----------------------------------------------   Weather  ----------------------------------------------------------
route!(property_weather => Get "/weather/{property_id}" impl DirectoryManagement);
/// Current conditions at the property's coordinates. The UV index is optional enrichment and is
/// silently omitted when its lookup fails; anything else failing fails the request.
pub async fn property_weather<B: DirectoryManagement>(
    _claims: JwtClaims,
    path: web::Path<i64>,
    directory: web::Data<DirectoryApi<B>>,
    weather: web::Data<WeatherApi>,
) -> Result<HttpResponse, ServerError> {
    let property_id = path.into_inner();
    let location = directory.property_location(property_id).await?;
    let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) else {
        return Err(ServerError::InvalidRequestBody("Property coordinates not set".to_string()));
    };
    let report = weather.current(latitude, longitude).await?;
    Ok(HttpResponse::Ok().json(report))
}
