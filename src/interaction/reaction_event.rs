//! Reaction-based role toggling.

use tracing::{Instrument, debug, error, info, instrument};

use crate::{
    base::types::{ReactionChange, Void},
    service::{chat::ChatClient, store::StoreClient},
};

/// Handles a reaction add/remove event.
#[instrument(skip_all)]
pub fn handle_reaction(change: ReactionChange, store: StoreClient, chat: ChatClient) {
    tokio::spawn(async move {
        // Process the event.
        let result = process_reaction(&change, &store, &chat).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Add or remove the role mapped to this message and emoji, if there is one.
#[instrument(skip_all, fields(message_id = change.message_id, emoji = %change.emoji))]
pub async fn process_reaction(change: &ReactionChange, store: &StoreClient, chat: &ChatClient) -> Void {
    let (Some(guild_id), Some(user_id)) = (change.guild_id, change.user_id) else {
        return Ok(());
    };

    if user_id == chat.bot_user_id() {
        return Ok(());
    }

    let roles = store.reaction_roles().await?;
    let Some(role_id) = roles.role_for(change.message_id, &change.emoji) else {
        debug!("No role mapped.");
        return Ok(());
    };

    if change.added {
        info!("Adding role {} to user {} ...", role_id, user_id);
        chat.add_role(guild_id, user_id, role_id).await
    } else {
        info!("Removing role {} from user {} ...", role_id, user_id);
        chat.remove_role(guild_id, user_id, role_id).await
    }
}
