//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the bot:
//! - Chat services (e.g., Discord)
//! - Stores for the JSON documents the bot consults (e.g., flat files)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod store;
