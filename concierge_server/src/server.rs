use std::time::Duration;

use actix_web::{http::KeepAlive, middleware::Logger, web, App, HttpServer};
use concierge_engine::{ChatApi, DirectoryApi, NotificationApi, OrderLedgerApi, SqliteDatabase};
use log::info;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    integrations::{AssistantApi, WeatherApi},
    relay::{ws_entry, ChatRelay},
    routes::{
        health,
        AdminCommissionsRoute,
        AdminExportOrdersRoute,
        AdminMonthlyCommissionsRoute,
        AdminOrdersRoute,
        AdminUsersRoute,
        AssistantChatRoute,
        BookingMessagesRoute,
        CreateNotificationRoute,
        CreateOrderRoute,
        GetServiceRoute,
        HealthDbRoute,
        ListPartnersRoute,
        ListServicesRoute,
        MarkAllNotificationsReadRoute,
        MarkNotificationReadRoute,
        MyNotificationsRoute,
        MyOrdersRoute,
        PropertyWeatherRoute,
        SendMessageRoute,
        UpdateOrderStatusRoute,
    },
};

const DB_POOL_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, DB_POOL_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<actix_web::dev::Server, ServerError> {
    let assistant = AssistantApi::new(config.assistant.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let weather = WeatherApi::new(config.weather.clone());
    // One relay shared by every worker, so rooms span all connections in the process.
    let relay: ChatRelay = ChatRelay::new();
    let host = config.host.clone();
    let port = config.port;
    info!("🚀️ Starting concierge server on {host}:{port}");
    let srv = HttpServer::new(move || {
        let ledger_api = OrderLedgerApi::new(db.clone());
        let chat_api = ChatApi::new(db.clone());
        let directory_api = DirectoryApi::new(db.clone());
        let notification_api = NotificationApi::new(db.clone());
        let verifier = TokenVerifier::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("vgx::access_log"))
            .app_data(web::Data::new(ledger_api))
            .app_data(web::Data::new(chat_api))
            .app_data(web::Data::new(directory_api))
            .app_data(web::Data::new(notification_api))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(assistant.clone()))
            .app_data(web::Data::new(weather.clone()))
            .app_data(web::Data::new(relay.clone()));
        // Literal paths are registered before their parameterised siblings, so e.g.
        // /services/partners is tried before /services/{id}.
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(AdminOrdersRoute::<SqliteDatabase>::new())
            .service(AdminExportOrdersRoute::<SqliteDatabase>::new())
            .service(AdminCommissionsRoute::<SqliteDatabase>::new())
            .service(AdminMonthlyCommissionsRoute::<SqliteDatabase>::new())
            .service(AdminUsersRoute::<SqliteDatabase>::new())
            .service(SendMessageRoute::<SqliteDatabase>::new())
            .service(BookingMessagesRoute::<SqliteDatabase>::new())
            .service(ListPartnersRoute::<SqliteDatabase>::new())
            .service(ListServicesRoute::<SqliteDatabase>::new())
            .service(GetServiceRoute::<SqliteDatabase>::new())
            .service(CreateNotificationRoute::<SqliteDatabase>::new())
            .service(MyNotificationsRoute::<SqliteDatabase>::new())
            .service(MarkAllNotificationsReadRoute::<SqliteDatabase>::new())
            .service(MarkNotificationReadRoute::<SqliteDatabase>::new())
            .service(AssistantChatRoute::<SqliteDatabase>::new())
            .service(PropertyWeatherRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(HealthDbRoute::<SqliteDatabase>::new())
            .service(api_scope)
            .route("/ws", web::get().to(ws_entry))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
