//! Common result aliases and the platform-neutral event types passed between
//! the chat service and the interaction handlers.

use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A file attached to an incoming message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// The uploaded file name.
    pub filename: String,
    /// The CDN URL the file can be downloaded from.
    pub url: String,
    /// The size of the file in bytes.
    pub size: u64,
}

/// A message as seen by the interaction handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// The guild the message was sent in, if any.
    pub guild_id: Option<u64>,
    /// The channel the message was sent in.
    pub channel_id: u64,
    /// The ID of the message itself.
    pub message_id: u64,
    /// The ID of the author.
    pub author_id: u64,
    /// The display name of the author.
    pub author_name: String,
    /// Whether the author is a bot account.
    pub author_is_bot: bool,
    /// The raw message content.
    pub content: String,
    /// Any attachments on the message.
    pub attachments: Vec<AttachmentRef>,
}

/// A reaction being added to or removed from a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionChange {
    /// The guild the reaction happened in, if any.
    pub guild_id: Option<u64>,
    /// The message that was reacted to.
    pub message_id: u64,
    /// The reacting user, if known.
    pub user_id: Option<u64>,
    /// The unicode emoji, or the name of a custom emoji.
    pub emoji: String,
    /// `true` when the reaction was added, `false` when removed.
    pub added: bool,
}

/// A single field of a [`Summary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl SummaryField {
    fn len(&self) -> usize {
        self.name.chars().count() + self.value.chars().count()
    }
}

/// A platform-neutral rich message (rendered as an embed on Discord).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub description: String,
    pub fields: Vec<SummaryField>,
    pub footer: Option<String>,
    pub color: Option<u32>,
}

/// Embed limits enforced by Discord.
pub const MAX_SUMMARY_FIELDS: usize = 25;
pub const MAX_FIELD_NAME_LEN: usize = 256;
pub const MAX_FIELD_VALUE_LEN: usize = 1024;
pub const MAX_DESCRIPTION_LEN: usize = 4096;
pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_FOOTER_LEN: usize = 2048;
/// Combined length of the title, description, footer and every field.
pub const MAX_SUMMARY_LEN: usize = 6000;

impl Summary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: truncate(&title.into(), MAX_TITLE_LEN),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = truncate(&description.into(), MAX_DESCRIPTION_LEN);
        self
    }

    /// Set the footer, cut down to whatever room the rest of the summary leaves.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = None;
        let room = MAX_SUMMARY_LEN.saturating_sub(self.len()).min(MAX_FOOTER_LEN);
        self.footer = Some(truncate(&footer.into(), room));
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Add a field, silently dropping it once the field count or total length limit is reached.
    ///
    /// Returns `false` if the field was dropped.
    pub fn push_field(&mut self, name: impl AsRef<str>, value: impl AsRef<str>, inline: bool) -> bool {
        if self.fields.len() >= MAX_SUMMARY_FIELDS {
            return false;
        }

        let value = value.as_ref();
        let value = if value.is_empty() { "\u{200b}" } else { value };

        let field = SummaryField {
            name: truncate(name.as_ref(), MAX_FIELD_NAME_LEN),
            value: truncate(value, MAX_FIELD_VALUE_LEN),
            inline,
        };

        if self.len() + field.len() > MAX_SUMMARY_LEN {
            return false;
        }

        self.fields.push(field);

        true
    }

    /// Length in characters, as Discord counts it against the total limit.
    pub fn len(&self) -> usize {
        let footer = self.footer.as_deref().map_or(0, |f| f.chars().count());
        let fields: usize = self.fields.iter().map(SummaryField::len).sum();

        self.title.chars().count() + self.description.chars().count() + footer + fields
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Truncate `text` to at most `max` characters, ending with an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    if max == 0 {
        return String::new();
    }

    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn push_field_stops_at_the_discord_limit() {
        let mut summary = Summary::new("t");

        for i in 0..MAX_SUMMARY_FIELDS {
            assert!(summary.push_field(format!("f{i}"), "v", true));
        }

        assert!(!summary.push_field("overflow", "v", true));
        assert_eq!(summary.fields.len(), MAX_SUMMARY_FIELDS);
    }

    #[test]
    fn push_field_replaces_empty_values() {
        let mut summary = Summary::new("t");
        summary.push_field("empty", "", false);

        assert_eq!(summary.fields[0].value, "\u{200b}");
    }

    #[test]
    fn title_and_footer_are_cut_to_discord_limits() {
        let summary = Summary::new("t".repeat(400)).with_footer("f".repeat(3000));

        assert_eq!(summary.title.chars().count(), MAX_TITLE_LEN);
        assert_eq!(summary.footer.unwrap().chars().count(), MAX_FOOTER_LEN);
    }

    #[test]
    fn push_field_keeps_the_total_under_the_discord_limit() {
        let mut summary = Summary::new("t".repeat(400)).with_description("d".repeat(5000));

        let mut pushed = 0;
        for i in 0..MAX_SUMMARY_FIELDS {
            if summary.push_field(format!("f{i}"), "v".repeat(2000), true) {
                pushed += 1;
            }
        }

        assert!(pushed < MAX_SUMMARY_FIELDS);
        assert!(summary.len() <= MAX_SUMMARY_LEN);

        let summary = summary.with_footer("x".repeat(3000));
        assert!(summary.len() <= MAX_SUMMARY_LEN);
    }
}
