pub mod discord;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Res, Summary, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Discord. IDs are plain integers so the interaction handlers stay free of
/// any one client library's types.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Used to recognize mentions of the bot and to ignore its own reactions.
    fn bot_user_id(&self) -> u64;

    /// Start the chat client listener.
    ///
    /// This connects to the platform and begins dispatching incoming events
    /// to the interaction handlers. Returns when the connection shuts down.
    async fn start(&self) -> Void;

    /// Send a plain text message to a channel.
    async fn send_message(&self, channel_id: u64, text: &str) -> Void;

    /// Send a rich summary (an embed on Discord) to a channel.
    async fn send_summary(&self, channel_id: u64, summary: &Summary) -> Void;

    /// React to a message with a unicode emoji.
    async fn react_to_message(&self, channel_id: u64, message_id: u64, emoji: &str) -> Void;

    /// Find a guild text channel by name.
    async fn find_channel(&self, guild_id: u64, name: &str) -> Res<Option<u64>>;

    /// Give a guild member a role.
    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Void;

    /// Take a role away from a guild member.
    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Void;

    /// Download the bytes of an attachment.
    async fn download_attachment(&self, url: &str) -> Res<Vec<u8>>;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
