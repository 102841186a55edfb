//! Commands and attachment inspection for incoming messages.

use futures::future::join_all;
use tracing::{Instrument, debug, error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        replies,
        types::{AttachmentRef, IncomingMessage, Void},
    },
    command::{self, CommandKind, Invocation, strat, timing},
    inspect::{self, InspectContext, Inspection, patch, settings::SettingsTable},
    service::{chat::ChatClient, store::StoreClient},
};

/// Handles a message event.
///
/// Spawns a new task so the gateway is never blocked on chat calls.
#[instrument(skip_all)]
pub fn handle_message(message: IncomingMessage, config: Config, store: StoreClient, chat: ChatClient) {
    tokio::spawn(async move {
        // Process the event.
        let result = process_message(&message, &config, &store, &chat).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Run a command if the message is one, otherwise inspect its attachments.
#[instrument(skip_all, fields(message_id = message.message_id))]
pub async fn process_message(message: &IncomingMessage, config: &Config, store: &StoreClient, chat: &ChatClient) -> Void {
    if message.author_is_bot {
        return Ok(());
    }

    match command::parse(&message.content, &config.command_prefix, chat.bot_user_id()) {
        Some(Ok(invocation)) => return run_command(invocation, message, config, store, chat).await,
        Some(Err(name)) => debug!("Ignoring unknown command `{}`.", name),
        None => {}
    }

    inspect_attachments(message, config, store, chat).await
}

async fn run_command(invocation: Invocation<'_>, message: &IncomingMessage, config: &Config, store: &StoreClient, chat: &ChatClient) -> Void {
    let kind = invocation.spec.kind;

    if !invocation.accepts_args() {
        debug!("Ignoring `{}` because it was given arguments.", invocation.spec.name);
        return Ok(());
    }

    info!("Running `{}` ...", invocation.spec.name);

    let reply = match kind {
        CommandKind::Help => command::help_text(),
        CommandKind::Add => return add_strat(invocation.args, message, config, chat).await,
        CommandKind::Convert => timing::reply(invocation.args),
        CommandKind::Enemy => store.enemies().await?.reply(invocation.args),
        CommandKind::Yo => format!("<@{}> yooooooooooo", message.author_id),
        CommandKind::Bizhawk | CommandKind::Tutorial | CommandKind::Debug | CommandKind::Nso | CommandKind::Damage => {
            command::static_reply(kind).unwrap_or_default().to_string()
        }
    };

    chat.send_message(message.channel_id, &reply).await
}

/// Parse a strat, acknowledge it, and announce it in the strats channel.
async fn add_strat(args: &str, message: &IncomingMessage, config: &Config, chat: &ChatClient) -> Void {
    let submission = match strat::parse(args) {
        Ok(submission) => submission,
        Err(e) => {
            debug!("Rejected strat: {}", e);
            return chat.send_message(message.channel_id, &strat::usage(chat.bot_user_id())).await;
        }
    };

    let Some(guild_id) = message.guild_id else {
        return chat.send_message(message.channel_id, "Strats can only be added from inside a server.").await;
    };

    if let Err(e) = chat.react_to_message(message.channel_id, message.message_id, replies::ACK_EMOJI).await {
        warn!("Failed to acknowledge strat: {}", e);
    }

    match chat.find_channel(guild_id, &config.strats_channel).await? {
        Some(strats) => chat.send_message(strats, &submission.announcement(&message.author_name)).await,
        None => {
            let text = format!("I couldn't find a #{} channel to post to.", config.strats_channel);
            chat.send_message(message.channel_id, &text).await
        }
    }
}

/// Download, classify, and summarize every reasonably sized attachment.
async fn inspect_attachments(message: &IncomingMessage, config: &Config, store: &StoreClient, chat: &ChatClient) -> Void {
    let candidates: Vec<&AttachmentRef> = message
        .attachments
        .iter()
        .filter(|a| {
            let fits = a.size <= config.max_attachment_bytes;
            if !fits {
                debug!("Skipping `{}` ({} bytes).", a.filename, a.size);
            }
            fits
        })
        .collect();

    if candidates.is_empty() {
        return Ok(());
    }

    let downloads = join_all(candidates.iter().map(|a| chat.download_attachment(&a.url))).await;

    let files: Vec<(&AttachmentRef, Vec<u8>)> = candidates
        .into_iter()
        .zip(downloads)
        .filter_map(|(attachment, download)| match download {
            Ok(data) => Some((attachment, data)),
            Err(e) => {
                warn!("Failed to download `{}`: {}", attachment.filename, e);
                None
            }
        })
        .collect();

    // The base ROM and settings table are only needed when there is a patch to apply.
    let (base_rom, settings) = if files.iter().any(|(_, data)| patch::is_patch(data)) {
        (store.base_rom().await?, store.patch_settings().await?)
    } else {
        (None, SettingsTable::default())
    };

    // Applying a patch walks a whole ROM, so keep it off the async workers.
    let uploads: Vec<(String, Vec<u8>)> = files.into_iter().map(|(attachment, data)| (attachment.filename.clone(), data)).collect();
    let inspections = tokio::task::spawn_blocking(move || {
        let ctx = InspectContext {
            settings: &settings,
            base_rom: base_rom.as_deref(),
        };

        uploads
            .into_iter()
            .map(|(filename, data)| {
                let inspection = inspect::inspect(&filename, &data, &ctx);
                (filename, inspection)
            })
            .collect::<Vec<_>>()
    })
    .await?;

    for (filename, inspection) in inspections {
        match inspection {
            Some(Inspection::Summary(summary)) => {
                info!("Summarizing `{}` ...", filename);
                if let Err(e) = chat.send_summary(message.channel_id, &summary).await {
                    warn!("Failed to send the summary of `{}`: {}", filename, e);
                }
            }
            Some(Inspection::Corrupt { filename, reason }) => {
                warn!("Unreadable patch `{}`: {}", filename, reason);
                if let Err(e) = chat.send_message(message.channel_id, &format!("I couldn't read `{filename}`: {reason}.")).await {
                    warn!("Failed to report `{}`: {}", filename, e);
                }
            }
            None => debug!("Nothing to say about `{}`.", filename),
        }
    }

    Ok(())
}
