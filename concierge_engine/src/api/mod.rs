pub mod chat_api;
pub mod directory_api;
pub mod ledger_api;
pub mod notification_api;
pub mod order_objects;
