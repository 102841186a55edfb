//! Core components, types, and utilities for the bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Canned reply text for the informational commands.
//! - Common types and result handling.

pub mod config;
pub mod replies;
pub mod types;
