//! Discord implementation of the chat client, on top of serenity.

use crate::{
    base::{
        config::Config,
        types::{AttachmentRef, IncomingMessage, ReactionChange, Res, Summary, Void},
    },
    interaction,
    service::store::StoreClient,
};
use anyhow::anyhow;
use async_trait::async_trait;
use serenity::{
    Client,
    all::{
        ChannelId, ChannelType, Context, CreateEmbed, CreateEmbedFooter, CreateMessage, EventHandler, GatewayIntents, GuildId, Http, Message, MessageId,
        Reaction, ReactionType, Ready, RoleId, UserId,
    },
};
use tracing::{info, instrument};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

/// Audit log reason attached to reaction-role changes.
const ROLE_REASON: &str = "Reaction role";

// Extra methods on `ChatClient` applied by the discord implementation.

impl ChatClient {
    /// Creates a new Discord chat client.
    pub async fn discord(config: &Config, store: StoreClient) -> Res<Self> {
        let client = DiscordChatClient::new(config, store).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<DiscordChatClient> for ChatClient {
    fn from(client: DiscordChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Event handler registered with serenity.
struct DiscordHandler {
    config: Config,
    store: StoreClient,
    chat: ChatClient,
}

/// Discord client implementation.
#[derive(Clone)]
struct DiscordChatClient {
    pub config: Config,
    pub bot_user_id: u64,
    pub http: Arc<Http>,
    pub downloader: reqwest::Client,
    pub store: StoreClient,
}

impl DiscordChatClient {
    /// Create a new Discord chat client.
    #[instrument(name = "DiscordChatClient::new", skip_all)]
    pub async fn new(config: &Config, store: StoreClient) -> Res<Self> {
        let http = Arc::new(Http::new(&config.discord_token));

        // Get the bot's user ID.

        let bot_user = http.get_current_user().await?;
        let bot_user_id = bot_user.id.get();

        info!("Discord bot user ID: {}", bot_user_id);

        Ok(Self {
            config: config.clone(),
            bot_user_id,
            http,
            downloader: reqwest::Client::new(),
            store,
        })
    }
}

/// Discord snowflakes are never zero, and serenity panics on one.
fn snowflake(raw: u64, what: &str) -> Res<u64> {
    if raw == 0 {
        return Err(anyhow!("Invalid {what} ID `0`"));
    }

    Ok(raw)
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    fn bot_user_id(&self) -> u64 {
        self.bot_user_id
    }

    async fn start(&self) -> Void {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = DiscordHandler {
            config: self.config.clone(),
            store: self.store.clone(),
            chat: ChatClient::from(self.clone()),
        };

        let mut client = Client::builder(&self.config.discord_token, intents).event_handler(handler).await?;

        // Shut the shards down cleanly on Ctrl-C.

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down ...");
                shard_manager.shutdown_all().await;
            }
        });

        client.start().await?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: u64, text: &str) -> Void {
        let channel = ChannelId::new(snowflake(channel_id, "channel")?);

        channel.say(&self.http, text).await.map_err(|e| anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self, summary))]
    async fn send_summary(&self, channel_id: u64, summary: &Summary) -> Void {
        let channel = ChannelId::new(snowflake(channel_id, "channel")?);

        let mut embed = CreateEmbed::new().title(&summary.title);

        if !summary.description.is_empty() {
            embed = embed.description(&summary.description);
        }

        for field in &summary.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }

        if let Some(footer) = &summary.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer));
        }

        if let Some(color) = summary.color {
            embed = embed.colour(color);
        }

        channel
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await
            .map_err(|e| anyhow!("Failed to send summary: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn react_to_message(&self, channel_id: u64, message_id: u64, emoji: &str) -> Void {
        let channel = ChannelId::new(snowflake(channel_id, "channel")?);
        let message = MessageId::new(snowflake(message_id, "message")?);

        channel
            .create_reaction(&self.http, message, ReactionType::Unicode(emoji.to_string()))
            .await
            .map_err(|e| anyhow!("Failed to react to message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_channel(&self, guild_id: u64, name: &str) -> Res<Option<u64>> {
        let guild = GuildId::new(snowflake(guild_id, "guild")?);
        let channels = guild.channels(&self.http).await?;

        let found = channels.values().find(|c| c.kind == ChannelType::Text && c.name == name).map(|c| c.id.get());

        Ok(found)
    }

    #[instrument(skip(self))]
    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Void {
        let guild = GuildId::new(snowflake(guild_id, "guild")?);
        let user = UserId::new(snowflake(user_id, "user")?);
        let role = RoleId::new(snowflake(role_id, "role")?);

        self.http.add_member_role(guild, user, role, Some(ROLE_REASON)).await.map_err(|e| anyhow!("Failed to add role: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Void {
        let guild = GuildId::new(snowflake(guild_id, "guild")?);
        let user = UserId::new(snowflake(user_id, "user")?);
        let role = RoleId::new(snowflake(role_id, "role")?);

        self.http.remove_member_role(guild, user, role, Some(ROLE_REASON)).await.map_err(|e| anyhow!("Failed to remove role: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn download_attachment(&self, url: &str) -> Res<Vec<u8>> {
        let response = self.downloader.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        Ok(bytes.to_vec())
    }
}

// Conversions from serenity's models.

fn incoming_message(message: &Message) -> IncomingMessage {
    IncomingMessage {
        guild_id: message.guild_id.map(|g| g.get()),
        channel_id: message.channel_id.get(),
        message_id: message.id.get(),
        author_id: message.author.id.get(),
        author_name: message.author.name.clone(),
        author_is_bot: message.author.bot,
        content: message.content.clone(),
        attachments: message
            .attachments
            .iter()
            .map(|a| AttachmentRef {
                filename: a.filename.clone(),
                url: a.url.clone(),
                size: u64::from(a.size),
            })
            .collect(),
    }
}

/// The key a reaction is looked up by: the unicode emoji, or a custom emoji's name.
fn emoji_key(emoji: &ReactionType) -> Option<String> {
    match emoji {
        ReactionType::Unicode(s) => Some(s.clone()),
        ReactionType::Custom { id, name, .. } => Some(name.clone().unwrap_or_else(|| id.get().to_string())),
        _ => None,
    }
}

fn reaction_change(reaction: &Reaction, added: bool) -> Option<ReactionChange> {
    Some(ReactionChange {
        guild_id: reaction.guild_id.map(|g| g.get()),
        message_id: reaction.message_id.get(),
        user_id: reaction.user_id.map(|u| u.get()),
        emoji: emoji_key(&reaction.emoji)?,
        added,
    })
}

// Gateway callbacks.

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is live", ready.user.name);
    }

    async fn message(&self, _ctx: Context, new_message: Message) {
        interaction::message_event::handle_message(incoming_message(&new_message), self.config.clone(), self.store.clone(), self.chat.clone());
    }

    async fn reaction_add(&self, _ctx: Context, add_reaction: Reaction) {
        if let Some(change) = reaction_change(&add_reaction, true) {
            interaction::reaction_event::handle_reaction(change, self.store.clone(), self.chat.clone());
        }
    }

    async fn reaction_remove(&self, _ctx: Context, removed_reaction: Reaction) {
        if let Some(change) = reaction_change(&removed_reaction, false) {
            interaction::reaction_event::handle_reaction(change, self.store.clone(), self.chat.clone());
        }
    }
}
