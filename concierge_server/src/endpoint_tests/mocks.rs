use concierge_engine::{
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
use mockall::mock;

mock! {
    pub LedgerDb {}
    impl LedgerManagement for LedgerDb {
        async fn ping(&self) -> Result<(), LedgerApiError>;
        async fn insert_order(&self, order: NewOrder) -> Result<OrderDetail, LedgerApiError>;
        async fn fetch_order_detail(&self, id: i64) -> Result<Option<OrderDetail>, LedgerApiError>;
        async fn fetch_orders_for_guest(&self, guest_id: i64) -> Result<Vec<OrderDetail>, LedgerApiError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<OrderDetail>, LedgerApiError>;
        async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<Order, LedgerApiError>;
        async fn commission_breakdown(&self, query: CommissionQueryFilter) -> Result<Vec<CommissionRow>, LedgerApiError>;
        async fn monthly_commissions(&self, year: i32, partner_id: Option<i64>) -> Result<Vec<MonthlyCommissionRow>, LedgerApiError>;
        async fn export_orders(&self, query: OrderQueryFilter) -> Result<Vec<ExportRecord>, LedgerApiError>;
        async fn fetch_partner(&self, id: i64) -> Result<Option<Partner>, LedgerApiError>;
    }
}

mock! {
    pub ChatDb {}
    impl ChatManagement for ChatDb {
        async fn fetch_booking_for_user(&self, booking_id: i64, user_id: i64) -> Result<Option<Booking>, ChatApiError>;
        async fn insert_message(&self, message: NewMessage) -> Result<MessageDetail, ChatApiError>;
        async fn fetch_messages(&self, booking_id: i64) -> Result<Vec<MessageDetail>, ChatApiError>;
        async fn mark_messages_read(&self, booking_id: i64, receiver_id: i64) -> Result<u64, ChatApiError>;
    }
}

mock! {
    pub DirectoryDb {}
    impl DirectoryManagement for DirectoryDb {
        async fn fetch_services(&self, filter: ServiceQueryFilter) -> Result<Vec<ServiceDetail>, DirectoryApiError>;
        async fn fetch_service(&self, id: i64) -> Result<Option<ServiceDetail>, DirectoryApiError>;
        async fn fetch_partners(&self, service_type: Option<ServiceType>) -> Result<Vec<Partner>, DirectoryApiError>;
        async fn fetch_users(&self, role: Option<Role>) -> Result<Vec<User>, DirectoryApiError>;
        async fn role_statistics(&self) -> Result<RoleStatistics, DirectoryApiError>;
        async fn fetch_property_location(&self, property_id: i64) -> Result<Option<PropertyLocation>, DirectoryApiError>;
        async fn fetch_property_context(&self, property_id: i64) -> Result<Option<PropertyContext>, DirectoryApiError>;
    }
}

mock! {
    pub NotificationDb {}
    impl NotificationManagement for NotificationDb {
        async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, NotificationApiError>;
        async fn fetch_notifications_for_user(&self, user_id: i64, unread_only: bool, limit: i64) -> Result<Vec<Notification>, NotificationApiError>;
        async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<u64, NotificationApiError>;
        async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64, NotificationApiError>;
    }
}
