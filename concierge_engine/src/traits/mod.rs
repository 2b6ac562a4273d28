//! # Database management and control.
//!
//! This module defines the interface contracts a database backend must satisfy to power the
//! concierge gateway. Handlers never touch SQL directly; they go through the public API structs,
//! which are generic over these traits.
//!
//! * [`LedgerManagement`] covers the order/commission ledger: order persistence, filtered search,
//!   status transitions and commission aggregation.
//! * [`ChatManagement`] covers the persistent message log and the booking-scoped access check.
//! * [`DirectoryManagement`] provides read-only lookups: services, partners, users and property
//!   data consumed by the outbound providers.
//! * [`NotificationManagement`] covers the user-scoped notification feed.
mod chat_management;
mod directory_management;
mod ledger_management;
mod notification_management;

pub use chat_management::{ChatApiError, ChatManagement};
pub use directory_management::{DirectoryApiError, DirectoryManagement};
pub use ledger_management::{LedgerApiError, LedgerManagement};
pub use notification_management::{NotificationApiError, NotificationManagement};
