//! Fixed-offset settings read out of a patched game image.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// Table compiled into the binary, used when no path is configured.
pub const BUILTIN_TABLE: &str = include_str!("../../data/patch_settings.json");

/// One setting stored as a single byte in the patched image.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ByteSetting {
    /// Display name.
    pub name: String,
    /// Byte offset into the patched image.
    pub offset: usize,
    /// Labels for known byte values; anything else renders as hex.
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    #[serde(default)]
    pub values: BTreeMap<u8, String>,
}

impl ByteSetting {
    /// Label for the byte at this setting's offset, or `None` past the end of the image.
    pub fn read(&self, image: &[u8]) -> Option<String> {
        let byte = *image.get(self.offset)?;

        Some(self.values.get(&byte).cloned().unwrap_or_else(|| format!("0x{byte:02X}")))
    }
}

/// The full table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SettingsTable {
    pub settings: Vec<ByteSetting>,
}

impl SettingsTable {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn builtin() -> serde_json::Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    /// `(name, label)` for every setting that lies inside `image`.
    pub fn classify(&self, image: &[u8]) -> Vec<(String, String)> {
        self.settings.iter().filter_map(|s| s.read(image).map(|label| (s.name.clone(), label))).collect()
    }
}
