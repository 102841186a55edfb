//! Flat-file implementation of the store.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    base::{config::Config, types::Res},
    command::enemy::EnemyTable,
    inspect::settings::SettingsTable,
};

use super::{GenericStore, ReactionRoles, StoreClient};

// Extra methods on `StoreClient` applied by the file implementation.

impl StoreClient {
    /// Creates a store backed by the files named in the config.
    pub fn json(config: &Config) -> Self {
        Self::new(std::sync::Arc::new(JsonStore::new(config)))
    }
}

/// Store that reads JSON documents from disk on every call.
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    pub enemies_path: Option<PathBuf>,
    pub reaction_roles_path: Option<PathBuf>,
    pub patch_settings_path: Option<PathBuf>,
    pub base_rom_path: Option<PathBuf>,
}

impl JsonStore {
    pub fn new(config: &Config) -> Self {
        Self {
            enemies_path: config.enemies_path.clone(),
            reaction_roles_path: config.reaction_roles_path.clone(),
            patch_settings_path: config.patch_settings_path.clone(),
            base_rom_path: config.base_rom_path.clone(),
        }
    }
}

async fn read_text(path: &Path) -> Res<String> {
    debug!("Reading `{}` ...", path.display());
    tokio::fs::read_to_string(path).await.with_context(|| format!("Failed to read `{}`", path.display()))
}

#[async_trait]
impl GenericStore for JsonStore {
    #[instrument(skip(self))]
    async fn enemies(&self) -> Res<EnemyTable> {
        let table = match &self.enemies_path {
            Some(path) => EnemyTable::from_json(&read_text(path).await?).with_context(|| format!("Invalid enemy table `{}`", path.display()))?,
            None => EnemyTable::builtin()?,
        };

        Ok(table)
    }

    #[instrument(skip(self))]
    async fn reaction_roles(&self) -> Res<ReactionRoles> {
        let Some(path) = &self.reaction_roles_path else {
            return Ok(ReactionRoles::default());
        };

        let roles = ReactionRoles::from_json(&read_text(path).await?).with_context(|| format!("Invalid reaction-role map `{}`", path.display()))?;

        Ok(roles)
    }

    #[instrument(skip(self))]
    async fn patch_settings(&self) -> Res<SettingsTable> {
        let table = match &self.patch_settings_path {
            Some(path) => SettingsTable::from_json(&read_text(path).await?).with_context(|| format!("Invalid patch settings table `{}`", path.display()))?,
            None => SettingsTable::builtin()?,
        };

        Ok(table)
    }

    #[instrument(skip(self))]
    async fn base_rom(&self) -> Res<Option<Vec<u8>>> {
        let Some(path) = &self.base_rom_path else {
            return Ok(None);
        };

        let rom = tokio::fs::read(path).await.with_context(|| format!("Failed to read base ROM `{}`", path.display()))?;

        Ok(Some(rom))
    }
}
