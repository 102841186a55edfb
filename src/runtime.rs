//! Runtime services and shared state for the bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, store::StoreClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the store client, chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The store client instance.
    pub store: StoreClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the store.
        let store = StoreClient::json(&config);

        // Initialize the discord client.
        let chat = ChatClient::discord(&config, store.clone()).await?;

        Ok(Self { config, store, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
