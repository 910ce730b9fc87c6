//! Normalization of stored and imported theme documents
//!
//! Any JSON value is reconciled field by field against a baseline
//! configuration. Older documents (flat single palette, missing flags or
//! links) and newer exports go through the same path, so there is no
//! version field and no separate migration step.

use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::schema::{FeatureFlag, Links, Palette, PaletteKey, ThemeConfig};

/// Flat palette keys from the single-palette schema
const LEGACY_PALETTE_FIELDS: [&str; 4] = ["background", "panel", "text", "muted"];

/// Where the values of one palette come from
#[derive(Debug, Clone, Copy, PartialEq)]
enum PaletteSource<'a> {
    /// `palettes.<key>` object
    Current(&'a Map<String, Value>),
    /// Top-level flat fields of the legacy schema
    Legacy(&'a Map<String, Value>),
    /// Nothing usable, keep the baseline palette
    Baseline,
}

type PaletteRule = for<'a> fn(&'a Map<String, Value>, PaletteKey) -> Option<PaletteSource<'a>>;

/// Checked in order, first match wins; no match means `Baseline`
const PALETTE_RULES: [PaletteRule; 2] = [current_palette, legacy_flat_palette];

fn current_palette(raw: &Map<String, Value>, key: PaletteKey) -> Option<PaletteSource<'_>> {
    raw.get("palettes")?
        .as_object()?
        .get(key.as_str())?
        .as_object()
        .map(PaletteSource::Current)
}

/// The legacy schema only ever described one dark-leaning palette
fn legacy_flat_palette(raw: &Map<String, Value>, key: PaletteKey) -> Option<PaletteSource<'_>> {
    if key != PaletteKey::Dark {
        return None;
    }
    LEGACY_PALETTE_FIELDS
        .iter()
        .any(|field| raw.get(*field).is_some_and(Value::is_string))
        .then_some(PaletteSource::Legacy(raw))
}

fn palette_source(raw: &Map<String, Value>, key: PaletteKey) -> PaletteSource<'_> {
    PALETTE_RULES
        .iter()
        .find_map(|rule| rule(raw, key))
        .unwrap_or(PaletteSource::Baseline)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn overlay_string(target: &mut String, raw: &Map<String, Value>, key: &str) {
    match raw.get(key) {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => *target = s.clone(),
        Some(other) => {
            warn!(key = %key, found = json_type(other), "Ignoring theme field with non-string value")
        }
    }
}

fn overlay_bool(target: &mut bool, raw: &Map<String, Value>, key: &str) {
    match raw.get(key) {
        None | Some(Value::Null) => {}
        Some(Value::Bool(b)) => *target = *b,
        Some(other) => {
            warn!(key = %key, found = json_type(other), "Ignoring theme field with non-bool value")
        }
    }
}

fn overlay_enum<T>(target: &mut T, raw: &Map<String, Value>, key: &str)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.get(key) {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => match s.parse() {
            Ok(parsed) => *target = parsed,
            Err(e) => warn!(key = %key, error = %e, "Ignoring unknown theme value"),
        },
        Some(other) => {
            warn!(key = %key, found = json_type(other), "Ignoring theme field with non-string value")
        }
    }
}

fn merge_palette(palette: &mut Palette, fields: &Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if let Some(target) = palette.field_mut(key) {
            overlay_string(target, fields, key);
        }
    }
}

fn merge_links(links: &mut Links, raw: &Map<String, Value>) {
    let Some(fields) = raw.get("links").and_then(Value::as_object) else {
        return;
    };
    for key in Links::FIELDS {
        if let Some(target) = links.field_mut(key) {
            overlay_string(target, fields, key);
        }
    }
}

fn merge_features(theme: &mut ThemeConfig, raw: &Map<String, Value>) {
    let Some(flags) = raw.get("features").and_then(Value::as_object) else {
        return;
    };
    for flag in FeatureFlag::ALL {
        let mut enabled = theme.features.get(*flag);
        overlay_bool(&mut enabled, flags, flag.key());
        theme.features.set(*flag, enabled);
    }

    let unknown: Vec<&str> = flags
        .keys()
        .map(String::as_str)
        .filter(|key| FeatureFlag::from_key(key).is_none())
        .collect();
    if !unknown.is_empty() {
        debug!(flags = ?unknown, "Dropping unknown feature flags");
    }
}

/// Reconcile an arbitrary JSON value against `baseline`.
///
/// Total, deterministic and idempotent: the result always carries every
/// schema field, and normalizing a serialized result returns it unchanged.
pub fn normalize(raw: &Value, baseline: &ThemeConfig) -> ThemeConfig {
    let mut theme = baseline.clone();

    let Some(raw) = raw.as_object() else {
        debug!(found = json_type(raw), "Theme document is not an object, using baseline");
        return theme;
    };

    overlay_string(&mut theme.title, raw, "title");
    overlay_string(&mut theme.subtitle, raw, "subtitle");
    overlay_string(&mut theme.logo_url, raw, "logoUrl");
    overlay_string(&mut theme.accent, raw, "accent");
    overlay_string(&mut theme.accent_foreground, raw, "accentForeground");
    overlay_enum(&mut theme.font, raw, "font");
    overlay_enum(&mut theme.mode, raw, "mode");
    overlay_bool(&mut theme.show_announcement, raw, "showAnnouncement");
    overlay_string(&mut theme.announcement_text, raw, "announcementText");

    for key in PaletteKey::ALL {
        let palette = theme.palettes.get_mut(key);
        match palette_source(raw, key) {
            PaletteSource::Current(fields) => merge_palette(palette, fields, &Palette::FIELDS),
            PaletteSource::Legacy(fields) => {
                info!(palette = key.as_str(), "Migrating legacy flat palette");
                merge_palette(palette, fields, &LEGACY_PALETTE_FIELDS);
            }
            PaletteSource::Baseline => {}
        }
    }

    merge_links(&mut theme.links, raw);
    merge_features(&mut theme, raw);

    theme
}
