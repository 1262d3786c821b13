pub mod app;
pub mod chat_client;
pub mod config;
pub mod conversation;
pub mod message;
