//! Rendering-side styling surface
//!
//! The session writes resolved theme values here as CSS custom properties
//! plus a color-scheme hint. A browser host maps this onto the document
//! root; [`CssVariables`] keeps them in memory and renders a stylesheet.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::config::{ResolvedMode, ThemeConfig};
use crate::constants::css;

/// Receiver for themed variables
pub trait StyleSurface {
    fn set_variable(&mut self, name: &str, value: &str);
    fn set_color_scheme(&mut self, mode: ResolvedMode);
}

/// Variable map for a configuration rendered in `mode`
pub fn theme_variables(config: &ThemeConfig, mode: ResolvedMode) -> [(&'static str, &str); 11] {
    let palette = config.palette(mode);
    [
        (css::BACKGROUND, palette.background.as_str()),
        (css::PANEL, palette.panel.as_str()),
        (css::PANEL_MUTED, palette.panel_muted.as_str()),
        (css::TEXT, palette.text.as_str()),
        (css::MUTED, palette.muted.as_str()),
        (css::BORDER, palette.border.as_str()),
        (css::RING, palette.ring.as_str()),
        (css::SHADOW, palette.shadow.as_str()),
        (css::ACCENT, config.accent.as_str()),
        (css::ACCENT_FOREGROUND, config.accent_foreground.as_str()),
        (css::FONT, config.font.stack()),
    ]
}

/// Push every variable for `config` in `mode` into `surface`
pub fn apply_theme(surface: &mut dyn StyleSurface, config: &ThemeConfig, mode: ResolvedMode) {
    for (name, value) in theme_variables(config, mode) {
        surface.set_variable(name, value);
    }
    surface.set_color_scheme(mode);
}

/// In-memory style surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssVariables {
    variables: BTreeMap<String, String>,
    color_scheme: Option<ResolvedMode>,
    writes: usize,
}

impl CssVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn color_scheme(&self) -> Option<ResolvedMode> {
        self.color_scheme
    }

    /// Number of times a theme has been applied
    pub fn apply_count(&self) -> usize {
        self.writes
    }

    /// `:root` block with the color-scheme hint and every variable
    pub fn to_stylesheet(&self) -> String {
        let mut out = String::from(":root {\n");
        if let Some(mode) = self.color_scheme {
            let _ = writeln!(out, "  color-scheme: {mode};");
        }
        for (name, value) in &self.variables {
            let _ = writeln!(out, "  {name}: {value};");
        }
        out.push_str("}\n");
        out
    }
}

impl StyleSurface for CssVariables {
    fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    fn set_color_scheme(&mut self, mode: ResolvedMode) {
        self.color_scheme = Some(mode);
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildOverrides, FontChoice, default_theme};

    #[test]
    fn test_apply_dark_palette() {
        let config = default_theme(&BuildOverrides::default());
        let mut surface = CssVariables::new();
        apply_theme(&mut surface, &config, ResolvedMode::Dark);

        assert_eq!(surface.get(css::BACKGROUND), Some("#0b1020"));
        assert_eq!(surface.get(css::SHADOW), Some("rgba(2, 6, 23, 0.55)"));
        assert_eq!(surface.get(css::ACCENT), Some(config.accent.as_str()));
        assert_eq!(surface.get(css::FONT), Some(FontChoice::SpaceGrotesk.stack()));
        assert_eq!(surface.color_scheme(), Some(ResolvedMode::Dark));
    }

    #[test]
    fn test_stylesheet_contains_all_variables() {
        let config = default_theme(&BuildOverrides::default());
        let mut surface = CssVariables::new();
        apply_theme(&mut surface, &config, ResolvedMode::Light);

        let sheet = surface.to_stylesheet();
        assert!(sheet.starts_with(":root {\n  color-scheme: light;\n"));
        for (name, value) in theme_variables(&config, ResolvedMode::Light) {
            assert!(sheet.contains(&format!("  {name}: {value};\n")), "missing {name}");
        }
    }
}
