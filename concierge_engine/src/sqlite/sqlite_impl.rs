use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::{db, db_url, new_pool, SqliteDatabaseError};
use crate::{
    db_types::{
        Booking,
        MessageDetail,
        NewMessage,
        NewNotification,
        NewOrder,
        Notification,
        Order,
        OrderDetail,
        OrderStatus,
        Partner,
        PropertyContext,
        PropertyLocation,
        Role,
        RoleStatistics,
        ServiceDetail,
        ServiceType,
        User,
    },
    order_objects::{
        CommissionQueryFilter,
        CommissionRow,
        ExportRecord,
        MonthlyCommissionRow,
        OrderQueryFilter,
        ServiceQueryFilter,
    },
    traits::{
        ChatApiError,
        ChatManagement,
        DirectoryApiError,
        DirectoryManagement,
        LedgerApiError,
        LedgerManagement,
        NotificationApiError,
        NotificationManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl LedgerManagement for SqliteDatabase {
    async fn ping(&self) -> Result<(), LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<OrderDetail, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = db::orders::insert_order(order, &mut conn).await?;
        debug!("🗃️ Order inserted with id {}", order.id);
        // Re-read through the joined view so the caller gets display names immediately.
        db::orders::fetch_order_detail(order.id, &mut conn)
            .await?
            .ok_or(LedgerApiError::OrderNotFound(order.id))
    }

    async fn fetch_order_detail(&self, id: i64) -> Result<Option<OrderDetail>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::orders::fetch_order_detail(id, &mut conn).await?)
    }

    async fn fetch_orders_for_guest(&self, guest_id: i64) -> Result<Vec<OrderDetail>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::orders::fetch_orders_for_guest(guest_id, &mut conn).await?)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetail>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::orders::search_orders(query, &mut conn).await?)
    }

    async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = db::orders::update_order_status(id, status, &mut conn).await?;
        order.ok_or(LedgerApiError::OrderNotFound(id))
    }

    async fn commission_breakdown(&self, query: CommissionQueryFilter) -> Result<Vec<CommissionRow>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::orders::commission_breakdown(query, &mut conn).await?)
    }

    async fn monthly_commissions(
        &self,
        year: i32,
        partner_id: Option<i64>,
    ) -> Result<Vec<MonthlyCommissionRow>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::orders::monthly_commissions(year, partner_id, &mut conn).await?)
    }

    async fn export_orders(&self, query: OrderQueryFilter) -> Result<Vec<ExportRecord>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::orders::export_orders(query, &mut conn).await?)
    }

    async fn fetch_partner(&self, id: i64) -> Result<Option<Partner>, LedgerApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::fetch_partner(id, &mut conn).await?)
    }
}

impl ChatManagement for SqliteDatabase {
    async fn fetch_booking_for_user(&self, booking_id: i64, user_id: i64) -> Result<Option<Booking>, ChatApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::chat::fetch_booking_for_user(booking_id, user_id, &mut conn).await?)
    }

    async fn insert_message(&self, message: NewMessage) -> Result<MessageDetail, ChatApiError> {
        let mut conn = self.pool.acquire().await?;
        let id = db::chat::insert_message(message, &mut conn).await?;
        db::chat::fetch_message_detail(id, &mut conn).await?.ok_or_else(|| {
            ChatApiError::DatabaseError(format!("Message #{id} vanished immediately after insert"))
        })
    }

    async fn fetch_messages(&self, booking_id: i64) -> Result<Vec<MessageDetail>, ChatApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::chat::fetch_messages(booking_id, &mut conn).await?)
    }

    async fn mark_messages_read(&self, booking_id: i64, receiver_id: i64) -> Result<u64, ChatApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::chat::mark_messages_read(booking_id, receiver_id, &mut conn).await?)
    }
}

impl DirectoryManagement for SqliteDatabase {
    async fn fetch_services(&self, filter: ServiceQueryFilter) -> Result<Vec<ServiceDetail>, DirectoryApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::fetch_services(filter, &mut conn).await?)
    }

    async fn fetch_service(&self, id: i64) -> Result<Option<ServiceDetail>, DirectoryApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::fetch_service(id, &mut conn).await?)
    }

    async fn fetch_partners(&self, service_type: Option<ServiceType>) -> Result<Vec<Partner>, DirectoryApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::fetch_partners(service_type, &mut conn).await?)
    }

    async fn fetch_users(&self, role: Option<Role>) -> Result<Vec<User>, DirectoryApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::fetch_users(role, &mut conn).await?)
    }

    async fn role_statistics(&self) -> Result<RoleStatistics, DirectoryApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::role_statistics(&mut conn).await?)
    }

    async fn fetch_property_location(&self, property_id: i64) -> Result<Option<PropertyLocation>, DirectoryApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::fetch_property_location(property_id, &mut conn).await?)
    }

    async fn fetch_property_context(&self, property_id: i64) -> Result<Option<PropertyContext>, DirectoryApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::directory::fetch_property_context(property_id, &mut conn).await?)
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::notifications::insert_notification(notification, &mut conn).await?)
    }

    async fn fetch_notifications_for_user(
        &self,
        user_id: i64,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::notifications::fetch_notifications_for_user(user_id, unread_only, limit, &mut conn).await?)
    }

    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<u64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::notifications::mark_notification_read(id, user_id, &mut conn).await?)
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(db::notifications::mark_all_notifications_read(user_id, &mut conn).await?)
    }
}
