pub mod chat;
pub mod directory;
pub mod notifications;
pub mod orders;
