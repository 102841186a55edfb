//! Read-only data documents the bot consults while handling events.

pub mod json;

use std::{collections::HashMap, ops::Deref, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    base::types::Res,
    command::enemy::EnemyTable,
    inspect::settings::SettingsTable,
};

// Traits.

/// Generic store trait that backends must implement.
///
/// Every call reads the document fresh, so edits to the backing files take
/// effect on the next event without a restart.
#[async_trait]
pub trait GenericStore: Send + Sync + 'static {
    /// The enemy health table.
    async fn enemies(&self) -> Res<EnemyTable>;

    /// The reaction-role map.
    ///
    /// An unconfigured map is empty rather than an error.
    async fn reaction_roles(&self) -> Res<ReactionRoles>;

    /// The patch settings offset table.
    async fn patch_settings(&self) -> Res<SettingsTable>;

    /// The unmodified game image, if one is configured.
    async fn base_rom(&self) -> Res<Option<Vec<u8>>>;
}

// Structs.

/// Store client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<dyn GenericStore>,
}

impl Deref for StoreClient {
    type Target = dyn GenericStore;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl StoreClient {
    pub fn new(inner: Arc<dyn GenericStore>) -> Self {
        Self { inner }
    }
}

// Data types.

/// Message ID → emoji → role ID.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ReactionRoles {
    #[serde_as(as = "HashMap<DisplayFromStr, HashMap<_, DisplayFromStr>>")]
    pub messages: HashMap<u64, HashMap<String, u64>>,
}

impl ReactionRoles {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The role toggled by `emoji` on `message_id`, if any.
    pub fn role_for(&self, message_id: u64, emoji: &str) -> Option<u64> {
        self.messages.get(&message_id)?.get(emoji).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_roles_parse_string_ids() {
        let roles = ReactionRoles::from_json(r#"{ "1172350000000000001": { "🏃": "1172360000000000002", "fusion": "3" } }"#).unwrap();

        assert_eq!(roles.role_for(1172350000000000001, "🏃"), Some(1172360000000000002));
        assert_eq!(roles.role_for(1172350000000000001, "fusion"), Some(3));
        assert_eq!(roles.role_for(1172350000000000001, "👍"), None);
        assert_eq!(roles.role_for(1, "🏃"), None);
    }

    #[test]
    fn reaction_roles_reject_non_numeric_ids() {
        assert!(ReactionRoles::from_json(r#"{ "abc": { "🏃": "1" } }"#).is_err());
        assert!(ReactionRoles::from_json(r#"{ "1": { "🏃": "role" } }"#).is_err());
    }
}
