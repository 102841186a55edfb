//! Enemy health table and the `enemy` command reply.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::base::replies;

/// One row of the enemy table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnemyEntry {
    /// Hit points.
    pub health: u32,
    /// Other names the enemy is looked up by.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Free-text notes shown under the health line.
    #[serde(default)]
    pub description: Option<String>,
    /// Canonical name of the boss this entry is a part of.
    #[serde(default)]
    pub parent: Option<String>,
}

/// Enemy table keyed by lowercase canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnemyTable {
    pub entries: BTreeMap<String, EnemyEntry>,
}

/// Table compiled into the binary, used when no path is configured.
pub const BUILTIN_TABLE: &str = include_str!("../../data/enemies.json");

/// Lowercase and collapse runs of whitespace.
pub fn normalize(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Capitalize the first letter of every word.
pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl EnemyTable {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, EnemyEntry> = serde_json::from_str(json)?;

        let entries = raw
            .into_iter()
            .map(|(name, mut entry)| {
                entry.parent = entry.parent.as_deref().map(normalize);
                (normalize(&name), entry)
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn builtin() -> serde_json::Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    /// Find an entry by canonical name first, then by alias.
    pub fn lookup(&self, name: &str) -> Option<(&str, &EnemyEntry)> {
        let key = normalize(name);

        if let Some((name, entry)) = self.entries.get_key_value(&key) {
            return Some((name.as_str(), entry));
        }

        self.entries
            .iter()
            .find(|(_, entry)| entry.aliases.iter().any(|alias| normalize(alias) == key))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// All parts of a multi-part boss, in name order.
    pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = (&'a str, &'a EnemyEntry)> + 'a {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.parent.as_deref() == Some(parent))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// The full reply for the `enemy` command.
    pub fn reply(&self, query: &str) -> String {
        let query = normalize(query);

        if query.is_empty() {
            return format!("Usage: `enemy <name>` {}", replies::ENEMY_LIST);
        }

        let Some((name, entry)) = self.lookup(&query) else {
            return format!("I don't know an enemy named \"{query}\". {}", replies::ENEMY_LIST);
        };

        let mut reply = format!("{} has {} health", title_case(name), entry.health);

        if let Some(description) = &entry.description {
            reply.push('\n');
            reply.push_str(description);
        }

        for (part, child) in self.children(name) {
            reply.push_str(&format!("\n- {} has {} health", title_case(part), child.health));
        }

        reply
    }
}
