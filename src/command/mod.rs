//! Command registry and message-to-command parsing.
//!
//! Everything here is pure: the interaction layer decides what to do with a
//! parsed [`Invocation`] and owns all chat calls.

pub mod enemy;
pub mod strat;
pub mod timing;

use crate::base::replies;

/// Every command the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Add,
    Bizhawk,
    Tutorial,
    Debug,
    Nso,
    Convert,
    Enemy,
    Damage,
    Yo,
}

/// Static description of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub kind: CommandKind,
    /// The word that invokes the command.
    pub name: &'static str,
    /// One-line help shown by `help`.
    pub help: &'static str,
    /// Hidden commands are left out of `help`.
    pub hidden: bool,
    /// Commands that take no arguments stay silent when given some.
    pub takes_args: bool,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::Help,
        name: "help",
        help: "for this list of commands",
        hidden: false,
        takes_args: false,
    },
    CommandSpec {
        kind: CommandKind::Add,
        name: "add",
        help: "<link>, <strat name>, <location>, <category>, <author(s)> to add a strat to the strats channel",
        hidden: false,
        takes_args: true,
    },
    CommandSpec {
        kind: CommandKind::Bizhawk,
        name: "bizhawk",
        help: "for guides on how to setup BizHawk",
        hidden: false,
        takes_args: false,
    },
    CommandSpec {
        kind: CommandKind::Tutorial,
        name: "tutorial",
        help: "for various full game tutorials",
        hidden: false,
        takes_args: false,
    },
    CommandSpec {
        kind: CommandKind::Debug,
        name: "debug",
        help: "for debug patches (useful for practicing)",
        hidden: false,
        takes_args: false,
    },
    CommandSpec {
        kind: CommandKind::Nso,
        name: "nso",
        help: "for converting NSO runs",
        hidden: false,
        takes_args: false,
    },
    CommandSpec {
        kind: CommandKind::Convert,
        name: "convert",
        help: "<time> to convert a 60 FPS (NSO) time to 59.7275 FPS (GBA)",
        hidden: false,
        takes_args: true,
    },
    CommandSpec {
        kind: CommandKind::Enemy,
        name: "enemy",
        help: "<name> for the health of an enemy",
        hidden: false,
        takes_args: true,
    },
    CommandSpec {
        kind: CommandKind::Damage,
        name: "damage",
        help: "for the damage and cooldown value table",
        hidden: false,
        takes_args: false,
    },
    CommandSpec {
        kind: CommandKind::Yo,
        name: "yooooooooooo",
        help: "",
        hidden: true,
        takes_args: false,
    },
];

/// A message that addressed a known command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub spec: &'static CommandSpec,
    /// Everything after the command word, trimmed.
    pub args: &'a str,
}

impl Invocation<'_> {
    /// Whether the command should run at all given its arguments.
    pub fn accepts_args(&self) -> bool {
        self.spec.takes_args || self.args.is_empty()
    }
}

/// Look up a command by name, ignoring case.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Strip the command prefix (or a leading bot mention) from `content`.
///
/// Returns the remainder with leading whitespace removed, or `None` if the
/// message is not addressed to the bot.
pub fn strip_prefix<'a>(content: &'a str, prefix: &str, bot_user_id: u64) -> Option<&'a str> {
    let content = content.trim_start();

    if let Some(rest) = content.strip_prefix(prefix) {
        return Some(rest.trim_start());
    }

    let plain = format!("<@{bot_user_id}>");
    let nick = format!("<@!{bot_user_id}>");

    content
        .strip_prefix(plain.as_str())
        .or_else(|| content.strip_prefix(nick.as_str()))
        .map(str::trim_start)
}

/// Split a message into the command word and its trimmed argument string.
///
/// Returns `None` when the message is not addressed to the bot at all, and
/// `Some(Err(name))` when it is but `name` is not a known command.
pub fn parse<'a>(content: &'a str, prefix: &str, bot_user_id: u64) -> Option<Result<Invocation<'a>, &'a str>> {
    let rest = strip_prefix(content, prefix, bot_user_id)?;

    let (name, args) = match rest.find(char::is_whitespace) {
        Some(i) => (&rest[..i], rest[i..].trim()),
        None => (rest, ""),
    };

    if name.is_empty() {
        return None;
    }

    Some(find(name).map(|spec| Invocation { spec, args }).ok_or(name))
}

/// Build the `help` reply: every visible command, sorted by name.
pub fn help_text() -> String {
    let mut visible: Vec<&CommandSpec> = COMMANDS.iter().filter(|c| !c.hidden).collect();
    visible.sort_by_key(|c| c.name);

    let mut message = replies::HELP_HEADER.to_string();
    for command in visible {
        message.push_str(&format!("***{}*** {}\n", command.name, command.help));
    }

    message
}

/// The canned reply for commands that only ever answer with fixed text.
pub fn static_reply(kind: CommandKind) -> Option<&'static str> {
    match kind {
        CommandKind::Bizhawk => Some(replies::BIZHAWK),
        CommandKind::Tutorial => Some(replies::TUTORIAL),
        CommandKind::Debug => Some(replies::DEBUG),
        CommandKind::Nso => Some(replies::NSO),
        CommandKind::Damage => Some(replies::DAMAGE),
        _ => None,
    }
}
