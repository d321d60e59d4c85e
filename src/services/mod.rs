// src/services/mod.rs
pub mod chat_api;
pub mod conversation;
