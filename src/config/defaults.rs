//! Baseline theme configuration
//!
//! The baseline is the fallback for missing or unreadable storage and the
//! right-hand side of every field merge in [`crate::config::migrate`].

use tracing::warn;

use super::schema::{
    Features, FontChoice, Links, Palette, Palettes, ThemeConfig, ThemeMode,
};

const DEFAULT_TITLE: &str = "Mini App Kit";
const DEFAULT_ACCENT: &str = "#0ea5e9";
const DEFAULT_FONT: FontChoice = FontChoice::SpaceGrotesk;
const DEFAULT_ADMIN_PASSCODE: &str = "change-me";

/// Values baked in at compile time. Changing them requires a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOverrides {
    pub title: Option<String>,
    pub accent: Option<String>,
    /// Font name as written in the build environment, parsed lazily
    pub font: Option<String>,
    pub admin_passcode: Option<String>,
}

impl BuildOverrides {
    /// Overrides captured from the build environment
    pub fn compiled() -> Self {
        Self {
            title: option_env!("MINIAPP_DEFAULT_TITLE").map(str::to_string),
            accent: option_env!("MINIAPP_DEFAULT_ACCENT").map(str::to_string),
            font: option_env!("MINIAPP_DEFAULT_FONT").map(str::to_string),
            admin_passcode: option_env!("MINIAPP_ADMIN_PASSCODE").map(str::to_string),
        }
    }

    /// Passcode for the cosmetic admin gate
    pub fn admin_passcode(&self) -> &str {
        self.admin_passcode
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_ADMIN_PASSCODE)
    }

    fn font_choice(&self) -> FontChoice {
        match self.font.as_deref() {
            None => DEFAULT_FONT,
            Some(name) => name.parse().unwrap_or_else(|e| {
                warn!(font = %name, error = %e, using = %DEFAULT_FONT, "Invalid build-time font override, using default");
                DEFAULT_FONT
            }),
        }
    }
}

pub fn default_dark_palette() -> Palette {
    Palette {
        background: "#0b1020".to_string(),
        panel: "#121826".to_string(),
        panel_muted: "#0f172a".to_string(),
        text: "#e5e7eb".to_string(),
        muted: "#9aa4b2".to_string(),
        border: "#1f2a3a".to_string(),
        ring: "#38bdf8".to_string(),
        shadow: "rgba(2, 6, 23, 0.55)".to_string(),
    }
}

pub fn default_light_palette() -> Palette {
    Palette {
        background: "#f8fafc".to_string(),
        panel: "#ffffff".to_string(),
        panel_muted: "#f1f5f9".to_string(),
        text: "#0f172a".to_string(),
        muted: "#64748b".to_string(),
        border: "#e2e8f0".to_string(),
        ring: "#0ea5e9".to_string(),
        shadow: "rgba(15, 23, 42, 0.12)".to_string(),
    }
}

fn default_links() -> Links {
    Links {
        primary_label: "Docs".to_string(),
        primary_url: "https://docs.farcaster.xyz/".to_string(),
        secondary_label: "GitHub".to_string(),
        secondary_url: "https://github.com/".to_string(),
    }
}

fn default_features() -> Features {
    Features {
        farcaster_connect: true,
        wallet_connect: true,
        leaderboard: true,
        daily_claim: true,
        admin_quick_actions: true,
        insights: true,
        automation: true,
        status_board: true,
    }
}

/// Build the baseline configuration with the given overrides applied
pub fn default_theme(overrides: &BuildOverrides) -> ThemeConfig {
    ThemeConfig {
        title: overrides
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        subtitle: "Professional theme + admin panel starter".to_string(),
        logo_url: "/logo.svg".to_string(),
        accent: overrides
            .accent
            .clone()
            .unwrap_or_else(|| DEFAULT_ACCENT.to_string()),
        accent_foreground: "#03131c".to_string(),
        font: overrides.font_choice(),
        mode: ThemeMode::System,
        palettes: Palettes {
            light: default_light_palette(),
            dark: default_dark_palette(),
        },
        show_announcement: true,
        announcement_text: "Announcement: Customize everything in /admin.".to_string(),
        links: default_links(),
        features: default_features(),
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        default_theme(&BuildOverrides::compiled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_without_overrides() {
        let theme = default_theme(&BuildOverrides::default());
        assert_eq!(theme.title, "Mini App Kit");
        assert_eq!(theme.accent, "#0ea5e9");
        assert_eq!(theme.font, FontChoice::SpaceGrotesk);
        assert_eq!(theme.mode, ThemeMode::System);
        assert_eq!(theme.palettes.dark, default_dark_palette());
        assert_eq!(theme.palettes.light, default_light_palette());
        assert_eq!(theme.features.enabled().count(), 8);
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = BuildOverrides {
            title: Some("Brand".to_string()),
            accent: Some("#ff0000".to_string()),
            font: Some("mono".to_string()),
            admin_passcode: Some("hunter2".to_string()),
        };
        let theme = default_theme(&overrides);
        assert_eq!(theme.title, "Brand");
        assert_eq!(theme.accent, "#ff0000");
        assert_eq!(theme.font, FontChoice::Mono);
        assert_eq!(overrides.admin_passcode(), "hunter2");
    }

    #[test]
    fn test_invalid_font_override_falls_back() {
        let overrides = BuildOverrides {
            font: Some("papyrus".to_string()),
            ..Default::default()
        };
        assert_eq!(default_theme(&overrides).font, FontChoice::SpaceGrotesk);
    }

    #[test]
    fn test_empty_passcode_uses_default() {
        let overrides = BuildOverrides {
            admin_passcode: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(overrides.admin_passcode(), "change-me");
    }
}
