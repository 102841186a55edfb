//! Randomizer spoiler log detection and summarizing.

use serde_json::{Map, Value};

const SEED_KEYS: &[&str] = &["seed", "Seed", "SeedHash", "seed_hash"];
const VERSION_KEYS: &[&str] = &["version", "Version", "RandomizerVersion"];
const SETTINGS_KEYS: &[&str] = &["settings", "Settings"];
const PLACEMENT_KEYS: &[&str] = &["locations", "item_locations", "ItemLocations", "Locations"];

/// The parts of a spoiler log worth showing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpoilerLog {
    pub seed: Option<String>,
    pub version: Option<String>,
    /// Settings in key order, values already rendered.
    pub settings: Vec<(String, String)>,
    pub placements: Option<usize>,
}

fn first<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| object.get(*k))
}

/// Render a setting value for display.
pub fn render(value: &Value) -> String {
    match value {
        Value::Bool(true) => "On".to_string(),
        Value::Bool(false) => "Off".to_string(),
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "None".to_string(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Flatten nested settings objects into `Parent / Child` names.
fn flatten(prefix: Option<&str>, object: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, value) in object {
        let name = match prefix {
            Some(p) => format!("{p} / {key}"),
            None => key.clone(),
        };

        match value {
            Value::Object(inner) => flatten(Some(&name), inner, out),
            other => out.push((name, render(other))),
        }
    }
}

impl SpoilerLog {
    /// Parse `data` as a spoiler log; anything that is not a JSON object with settings is `None`.
    pub fn detect(data: &[u8]) -> Option<Self> {
        let data = data.strip_prefix(b"\xef\xbb\xbf").unwrap_or(data);
        let root: Value = serde_json::from_slice(data).ok()?;
        let root = root.as_object()?;
        let settings = first(root, SETTINGS_KEYS)?.as_object()?;

        let mut rendered = Vec::new();
        flatten(None, settings, &mut rendered);

        let scalar = |keys: &[&str]| first(root, keys).filter(|v| !v.is_null()).map(render);

        let placements = first(root, PLACEMENT_KEYS).and_then(|v| match v {
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        });

        Some(Self {
            seed: scalar(SEED_KEYS),
            version: scalar(VERSION_KEYS),
            settings: rendered,
            placements,
        })
    }

    /// One-line description of the seed.
    pub fn headline(&self) -> String {
        let mut parts = Vec::new();

        if let Some(seed) = &self.seed {
            parts.push(format!("Seed `{seed}`"));
        }
        if let Some(version) = &self.version {
            parts.push(format!("version {version}"));
        }
        if let Some(n) = self.placements {
            parts.push(format!("{n} item placements"));
        }

        if parts.is_empty() { "Spoiler log".to_string() } else { parts.join(" · ") }
    }
}
