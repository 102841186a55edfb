//! Attachment inspection.
//!
//! Uploads are classified by content:
//! - BPS patches are decoded, applied to the base ROM when one is
//!   configured, and their settings read at fixed offsets.
//! - Spoiler logs are parsed for their seed and settings.
//!
//! Everything else is ignored.

pub mod patch;
pub mod settings;
pub mod spoiler;

use crate::base::types::{Summary, truncate};
use patch::{Patch, PatchError};
use settings::SettingsTable;
use spoiler::SpoilerLog;

/// Embed colors.
const PATCH_COLOR: u32 = 0x7b2fbe;
const SPOILER_COLOR: u32 = 0x2f9e44;

/// Longest metadata excerpt shown for a patch.
const METADATA_EXCERPT: usize = 512;

/// What an attachment turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Inspection {
    /// A recognized file, ready to post.
    Summary(Summary),
    /// A file that looked like a patch but could not be read.
    Corrupt { filename: String, reason: String },
}

/// Inputs that are the same for every attachment.
pub struct InspectContext<'a> {
    pub settings: &'a SettingsTable,
    /// The unmodified image patches are applied to, if configured.
    pub base_rom: Option<&'a [u8]>,
}

/// Classify and summarize one attachment. `None` means "not interesting".
pub fn inspect(filename: &str, data: &[u8], ctx: &InspectContext<'_>) -> Option<Inspection> {
    if patch::is_patch(data) {
        return Some(match Patch::parse(data) {
            Ok(parsed) => Inspection::Summary(summarize_patch(filename, &parsed, ctx)),
            Err(e) => Inspection::Corrupt {
                filename: filename.to_string(),
                reason: e.to_string(),
            },
        });
    }

    SpoilerLog::detect(data).map(|log| Inspection::Summary(summarize_spoiler(filename, &log)))
}

/// Build the summary for a decoded patch.
pub fn summarize_patch(filename: &str, parsed: &Patch<'_>, ctx: &InspectContext<'_>) -> Summary {
    let mut summary = Summary::new(format!("Patch: {filename}"))
        .with_description(format!("BPS patch, {} → {} bytes", parsed.source_size, parsed.target_size))
        .with_color(PATCH_COLOR);

    summary.push_field("Base CRC32", format!("`{:08X}`", parsed.source_crc), true);
    summary.push_field("Patched CRC32", format!("`{:08X}`", parsed.target_crc), true);

    if let Some(text) = parsed.metadata_text() {
        summary.push_field("Metadata", format!("```\n{}\n```", truncate(text, METADATA_EXCERPT)), false);
    }

    let image = match ctx.base_rom {
        None => Err("no base ROM is configured".to_string()),
        Some(rom) => parsed.apply(rom).map_err(|e| match e {
            PatchError::SourceChecksum { .. } | PatchError::SourceSize { .. } => format!("patch is not for this game ({e})"),
            other => other.to_string(),
        }),
    };

    match image {
        Ok(image) => {
            let mut shown = 0;
            for (name, value) in ctx.settings.classify(&image) {
                if !summary.push_field(name, value, true) {
                    break;
                }
                shown += 1;
            }

            if shown == 0 {
                summary = summary.with_footer("No known settings in this image.");
            }
        }
        Err(reason) => summary = summary.with_footer(format!("Settings unavailable: {reason}.")),
    }

    summary
}

/// Build the summary for a spoiler log.
pub fn summarize_spoiler(filename: &str, log: &SpoilerLog) -> Summary {
    let mut summary = Summary::new(format!("Spoiler log: {filename}")).with_description(log.headline()).with_color(SPOILER_COLOR);

    let mut dropped = 0;
    for (name, value) in &log.settings {
        if !summary.push_field(name, value, true) {
            dropped += 1;
        }
    }

    if dropped > 0 {
        summary = summary.with_footer(format!("{dropped} more settings not shown."));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SettingsTable {
        SettingsTable::from_json(r#"[{ "name": "Split Security", "offset": 1, "values": { "1": "On" } }]"#).unwrap()
    }

    #[test]
    fn patch_without_base_rom_explains_missing_settings() {
        let source = vec![0u8; 4];
        let (data, _) = patch::build::overwrite(&source, &[(1, 1)], b"");
        let table = table();
        let ctx = InspectContext { settings: &table, base_rom: None };

        let Some(Inspection::Summary(summary)) = inspect("seed.bps", &data, &ctx) else {
            panic!("expected a summary");
        };

        assert_eq!(summary.title, "Patch: seed.bps");
        assert_eq!(summary.description, "BPS patch, 4 → 4 bytes");
        assert_eq!(summary.fields.len(), 2);
        assert_eq!(summary.footer.as_deref(), Some("Settings unavailable: no base ROM is configured."));
    }

    #[test]
    fn patch_with_base_rom_reads_settings() {
        let source = vec![0u8; 4];
        let (data, _) = patch::build::overwrite(&source, &[(1, 1)], b"generator 1.0");
        let table = table();
        let ctx = InspectContext { settings: &table, base_rom: Some(&source) };

        let Some(Inspection::Summary(summary)) = inspect("seed.bps", &data, &ctx) else {
            panic!("expected a summary");
        };

        let names: Vec<&str> = summary.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Base CRC32", "Patched CRC32", "Metadata", "Split Security"]);
        assert_eq!(summary.fields[3].value, "On");
        assert_eq!(summary.footer, None);
    }

    #[test]
    fn patch_for_another_game_is_reported_in_footer() {
        let source = vec![0u8; 4];
        let (data, _) = patch::build::overwrite(&source, &[(1, 1)], b"");
        let other = vec![9u8; 4];
        let table = table();
        let ctx = InspectContext { settings: &table, base_rom: Some(&other) };

        let Some(Inspection::Summary(summary)) = inspect("seed.bps", &data, &ctx) else {
            panic!("expected a summary");
        };

        assert!(summary.footer.unwrap().starts_with("Settings unavailable: patch is not for this game"));
    }

    #[test]
    fn corrupt_patch_is_flagged() {
        let table = table();
        let ctx = InspectContext { settings: &table, base_rom: None };

        let result = inspect("bad.bps", b"BPS1 is not enough", &ctx);

        assert!(matches!(result, Some(Inspection::Corrupt { ref filename, .. }) if filename == "bad.bps"));
    }

    #[test]
    fn spoiler_log_overflow_is_counted() {
        let settings: serde_json::Map<String, serde_json::Value> = (0..30).map(|i| (format!("s{i:02}"), serde_json::Value::Bool(true))).collect();
        let json = serde_json::json!({ "seed": "abc", "settings": settings }).to_string();
        let table = table();
        let ctx = InspectContext { settings: &table, base_rom: None };

        let Some(Inspection::Summary(summary)) = inspect("spoiler.json", json.as_bytes(), &ctx) else {
            panic!("expected a summary");
        };

        assert_eq!(summary.fields.len(), 25);
        assert_eq!(summary.footer.as_deref(), Some("5 more settings not shown."));
        assert_eq!(summary.description, "Seed `abc`");
    }

    #[test]
    fn spoiler_log_with_long_values_stays_within_embed_limits() {
        let settings: serde_json::Map<String, serde_json::Value> = (0..10).map(|i| (format!("s{i}"), serde_json::Value::String("x".repeat(2000)))).collect();
        let json = serde_json::json!({ "seed": "abc", "settings": settings }).to_string();
        let table = table();
        let ctx = InspectContext { settings: &table, base_rom: None };

        let Some(Inspection::Summary(summary)) = inspect(&format!("{}.json", "a".repeat(400)), json.as_bytes(), &ctx) else {
            panic!("expected a summary");
        };

        assert_eq!(summary.title.chars().count(), crate::base::types::MAX_TITLE_LEN);
        assert!(summary.len() <= crate::base::types::MAX_SUMMARY_LEN);
        assert_eq!(summary.fields.len(), 5);
        assert_eq!(summary.footer.as_deref(), Some("5 more settings not shown."));
    }

    #[test]
    fn other_files_are_ignored() {
        let table = table();
        let ctx = InspectContext { settings: &table, base_rom: None };

        assert!(inspect("notes.txt", b"just some text", &ctx).is_none());
    }
}
