//! # chatbot_core
//!
//! Core domain logic for the chatbot: session persistence, the completion
//! provider adapter, and the chat turn flow that composes them.

pub mod chat;
pub mod completion;
pub mod embed;
pub mod locks;
pub mod migrate;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
