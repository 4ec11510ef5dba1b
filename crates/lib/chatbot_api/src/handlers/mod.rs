//! Request handlers.

pub mod chat;
pub mod embed;
pub mod health;
