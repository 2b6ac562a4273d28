mod admin;
mod chat;
mod helpers;
mod mocks;
mod orders;
