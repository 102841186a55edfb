//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::PathBuf, sync::Arc};

use serde::Deserialize;

use super::types::Res;

/// Upper bound for `max_attachment_bytes`.
const ATTACHMENT_BYTES_CEILING: u64 = 64 * 1024 * 1024;

/// Default command prefix.
fn default_command_prefix() -> String {
    "!".to_string()
}

/// Default name of the channel that strat announcements go to.
fn default_strats_channel() -> String {
    "strats".to_string()
}

/// Default upper bound on the size of an inspected attachment.
fn default_max_attachment_bytes() -> u64 {
    8 * 1024 * 1024
}

/// Configuration for the bot.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Discord bot token (`CSTRATTYW_DISCORD_TOKEN`).
    pub discord_token: String,
    /// Prefix that marks a message as a command (`CSTRATTYW_COMMAND_PREFIX`).
    /// Mentioning the bot works as a prefix too.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Name of the guild channel strat announcements are posted to (`CSTRATTYW_STRATS_CHANNEL`).
    #[serde(default = "default_strats_channel")]
    pub strats_channel: String,
    /// JSON enemy table (`CSTRATTYW_ENEMIES_PATH`).
    /// The built-in table is used when unset.
    #[serde(default)]
    pub enemies_path: Option<PathBuf>,
    /// JSON reaction-role map (`CSTRATTYW_REACTION_ROLES_PATH`).
    /// Reaction roles are disabled when unset.
    #[serde(default)]
    pub reaction_roles_path: Option<PathBuf>,
    /// JSON table of patch setting offsets (`CSTRATTYW_PATCH_SETTINGS_PATH`).
    /// The built-in table is used when unset.
    #[serde(default)]
    pub patch_settings_path: Option<PathBuf>,
    /// Unmodified game image used to apply uploaded patches (`CSTRATTYW_BASE_ROM_PATH`).
    #[serde(default)]
    pub base_rom_path: Option<PathBuf>,
    /// Largest attachment, in bytes, that will be downloaded and inspected (`CSTRATTYW_MAX_ATTACHMENT_BYTES`).
    #[serde(default = "default_max_attachment_bytes")]
    pub max_attachment_bytes: u64,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("CSTRATTYW"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the values that serde cannot.
    pub fn validate(&self) -> Res<()> {
        if self.discord_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Discord token must not be empty."));
        }

        if self.command_prefix.is_empty() || self.command_prefix.chars().any(char::is_whitespace) {
            return Err(anyhow::anyhow!("Command prefix must be non-empty and contain no whitespace."));
        }

        if self.max_attachment_bytes < 1 || self.max_attachment_bytes > ATTACHMENT_BYTES_CEILING {
            return Err(anyhow::anyhow!("Max attachment bytes must be between 1 and {ATTACHMENT_BYTES_CEILING}."));
        }

        Ok(())
    }
}
