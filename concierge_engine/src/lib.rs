//! Concierge Engine
//!
//! The concierge engine is the domain backend of the vacation-rental guest-experience gateway. It
//! owns the order & commission ledger, the persistent chat log, the read-only service/partner
//! directory and the notification feed.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@traits`] and the SQLite backend). You should never
//!    need to access the database directly; backends implement the trait seams and everything else
//!    goes through the public API. The exception is the data types used in the database, which are
//!    defined in the `db_types` module and are public.
//! 2. The engine public API ([`OrderLedgerApi`], [`ChatApi`], [`DirectoryApi`],
//!    [`NotificationApi`]). These own the domain logic: commission resolution happens once at
//!    order creation, commission totals are folded from the grouped rows they were reported with,
//!    and every chat operation is gated on the booking access check.
mod api;

pub mod db_types;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use api::{
    chat_api::ChatApi,
    directory_api::{DirectoryApi, UserReport},
    ledger_api::{resolve_commission, OrderLedgerApi},
    notification_api::NotificationApi,
    order_objects,
};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteDatabase, SqliteDatabaseError};
