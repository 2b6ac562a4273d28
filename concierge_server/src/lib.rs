//! # Concierge gateway server
//!
//! The HTTP and WebSocket surface of the vacation-rental guest-experience gateway. It is
//! responsible for:
//! * the order and commission ledger endpoints (guest ordering, admin reporting and export),
//! * the booking-scoped chat endpoints and the room-keyed real-time relay,
//! * the service/partner directory, notifications, and the two outbound provider integrations
//!   (guest assistant, weather).
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Consistency model
//! The database, reached through `concierge_engine`, is the source of truth for everything. The
//! WebSocket relay in [`relay`] is fire-and-forget on top of it; see that module's documentation.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod relay;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
