//! Event handling and user interactions for the bot.
//!
//! This module provides functionality for handling chat events:
//! - Dispatching prefixed and @-mention commands
//! - Inspecting uploaded spoiler logs and patches
//! - Toggling roles from reactions
//!
//! Each `handle_*` function spawns the work and logs any error; the matching
//! `process_*` function does the work and is what the tests drive.

pub mod message_event;
pub mod reaction_event;
