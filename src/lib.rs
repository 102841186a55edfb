//! Library root for `cstrattyw`.
//!
//! CStrattyW is a helper bot for the Metroid Fusion speedrunning Discord, designed to:
//! - Answer informational commands with guides and links
//! - Look up enemy health and convert NSO times
//! - Announce new strats in the strats channel
//! - Summarize uploaded randomizer spoiler logs and patches
//! - Toggle roles from reactions on configured messages
//!
//! The bot integrates with Discord for chat and flat JSON files for its data.
//! The architecture is built around traits at those seams so that each can be
//! swapped out, or mocked in tests.

pub mod base;
pub mod command;
pub mod inspect;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the bot runtime:
/// - Creates the runtime context with the store and chat clients
/// - Starts the gateway connection for processing events
pub async fn start(config: Config) -> Void {
    info!("Starting cstrattyw ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
