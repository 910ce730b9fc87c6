//! Theme configuration schema
//!
//! Describes the shape every configuration must have once it reaches the
//! rendering layer. Serialized form is camelCase JSON.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Font family choice (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontChoice {
    System,
    Inter,
    SpaceGrotesk,
    Mono,
}

impl FontChoice {
    pub const ALL: [FontChoice; 4] = [
        FontChoice::System,
        FontChoice::Inter,
        FontChoice::SpaceGrotesk,
        FontChoice::Mono,
    ];

    /// Serialized name
    pub fn as_str(self) -> &'static str {
        match self {
            FontChoice::System => "system",
            FontChoice::Inter => "inter",
            FontChoice::SpaceGrotesk => "spaceGrotesk",
            FontChoice::Mono => "mono",
        }
    }

    /// CSS font stack for this choice
    pub fn stack(self) -> &'static str {
        match self {
            FontChoice::System => "system-ui, -apple-system, Segoe UI, Roboto, sans-serif",
            FontChoice::Inter => "Inter, system-ui, -apple-system, Segoe UI, Roboto, sans-serif",
            FontChoice::SpaceGrotesk => {
                "\"Space Grotesk\", system-ui, -apple-system, Segoe UI, Roboto, sans-serif"
            }
            FontChoice::Mono => {
                "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", \"Courier New\", monospace"
            }
        }
    }
}

impl FromStr for FontChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontChoice::ALL
            .into_iter()
            .find(|font| font.as_str() == s)
            .ok_or_else(|| format!("unknown font '{s}' (expected system, inter, spaceGrotesk or mono)"))
    }
}

impl fmt::Display for FontChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested color mode; `System` defers to the host preference signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    System,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::System => "system",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Resolve against the host's "prefers dark" signal
    pub fn resolve(self, prefers_dark: bool) -> ResolvedMode {
        match self {
            ThemeMode::Light => ResolvedMode::Light,
            ThemeMode::Dark => ResolvedMode::Dark,
            ThemeMode::System if prefers_dark => ResolvedMode::Dark,
            ThemeMode::System => ResolvedMode::Light,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(ThemeMode::System),
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown mode '{other}' (expected system, light or dark)")),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete mode in effect after resolving `ThemeMode::System`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedMode {
    Light,
    Dark,
}

impl ResolvedMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedMode::Light => "light",
            ResolvedMode::Dark => "dark",
        }
    }

    pub fn palette_key(self) -> PaletteKey {
        match self {
            ResolvedMode::Light => PaletteKey::Light,
            ResolvedMode::Dark => PaletteKey::Dark,
        }
    }
}

impl fmt::Display for ResolvedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of one of the two palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteKey {
    Light,
    Dark,
}

impl PaletteKey {
    pub const ALL: [PaletteKey; 2] = [PaletteKey::Light, PaletteKey::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            PaletteKey::Light => "light",
            PaletteKey::Dark => "dark",
        }
    }
}

impl FromStr for PaletteKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(PaletteKey::Light),
            "dark" => Ok(PaletteKey::Dark),
            other => Err(format!("unknown palette '{other}' (expected light or dark)")),
        }
    }
}

/// Colors and shadow used to paint one visual mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: String,
    pub panel: String,
    pub panel_muted: String,
    pub text: String,
    pub muted: String,
    pub border: String,
    pub ring: String,
    pub shadow: String,
}

impl Palette {
    /// Serialized field names, in declaration order
    pub const FIELDS: [&'static str; 8] = [
        "background",
        "panel",
        "panelMuted",
        "text",
        "muted",
        "border",
        "ring",
        "shadow",
    ];

    /// Mutable access by serialized field name
    pub fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "background" => Some(&mut self.background),
            "panel" => Some(&mut self.panel),
            "panelMuted" => Some(&mut self.panel_muted),
            "text" => Some(&mut self.text),
            "muted" => Some(&mut self.muted),
            "border" => Some(&mut self.border),
            "ring" => Some(&mut self.ring),
            "shadow" => Some(&mut self.shadow),
            _ => None,
        }
    }
}

/// The light/dark palette pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palettes {
    pub light: Palette,
    pub dark: Palette,
}

impl Palettes {
    pub fn get(&self, key: PaletteKey) -> &Palette {
        match key {
            PaletteKey::Light => &self.light,
            PaletteKey::Dark => &self.dark,
        }
    }

    pub fn get_mut(&mut self, key: PaletteKey) -> &mut Palette {
        match key {
            PaletteKey::Light => &mut self.light,
            PaletteKey::Dark => &mut self.dark,
        }
    }
}

/// Footer links
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Links {
    pub primary_label: String,
    pub primary_url: String,
    pub secondary_label: String,
    pub secondary_url: String,
}

impl Links {
    pub const FIELDS: [&'static str; 4] =
        ["primaryLabel", "primaryUrl", "secondaryLabel", "secondaryUrl"];

    pub fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "primaryLabel" => Some(&mut self.primary_label),
            "primaryUrl" => Some(&mut self.primary_url),
            "secondaryLabel" => Some(&mut self.secondary_label),
            "secondaryUrl" => Some(&mut self.secondary_url),
            _ => None,
        }
    }
}

/// Declares the closed feature flag set once: the `FeatureFlag` enum, the
/// serialized key of each flag and the `Features` record all come from here.
macro_rules! feature_flags {
    ($( $(#[$doc:meta])* $variant:ident => $field:ident : $key:literal ),+ $(,)?) => {
        /// Known feature flags
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FeatureFlag {
            $( $(#[$doc])* $variant ),+
        }

        impl FeatureFlag {
            pub const ALL: &'static [FeatureFlag] = &[$( FeatureFlag::$variant ),+];

            /// Serialized flag name
            pub fn key(self) -> &'static str {
                match self {
                    $( FeatureFlag::$variant => $key ),+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                match key {
                    $( $key => Some(FeatureFlag::$variant), )+
                    _ => None,
                }
            }
        }

        /// Module feature flags
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        pub struct Features {
            $(
                $(#[$doc])*
                #[serde(rename = $key)]
                pub $field: bool,
            )+
        }

        impl Features {
            pub fn get(&self, flag: FeatureFlag) -> bool {
                match flag {
                    $( FeatureFlag::$variant => self.$field ),+
                }
            }

            pub fn set(&mut self, flag: FeatureFlag, enabled: bool) {
                match flag {
                    $( FeatureFlag::$variant => self.$field = enabled ),+
                }
            }
        }
    };
}

feature_flags! {
    /// Farcaster connect button on the home page
    FarcasterConnect => farcaster_connect: "enableFarcasterConnect",
    /// Wallet connect placeholder
    WalletConnect => wallet_connect: "enableWalletConnect",
    Leaderboard => leaderboard: "enableLeaderboard",
    DailyClaim => daily_claim: "enableDailyClaim",
    /// Logout button and shortcuts in the admin header
    AdminQuickActions => admin_quick_actions: "enableAdminQuickActions",
    Insights => insights: "enableInsights",
    Automation => automation: "enableAutomation",
    StatusBoard => status_board: "enableStatusBoard",
}

impl Features {
    /// Flags currently switched on, in declaration order
    pub fn enabled(&self) -> impl Iterator<Item = FeatureFlag> + '_ {
        FeatureFlag::ALL.iter().copied().filter(|flag| self.get(*flag))
    }
}

impl FromStr for FeatureFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureFlag::from_key(s).ok_or_else(|| {
            let known: Vec<&str> = FeatureFlag::ALL.iter().map(|f| f.key()).collect();
            format!("unknown feature flag '{s}' (known: {})", known.join(", "))
        })
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Complete branding, appearance and feature configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub title: String,
    pub subtitle: String,
    pub logo_url: String,
    pub accent: String,
    pub accent_foreground: String,
    pub font: FontChoice,
    pub mode: ThemeMode,
    pub palettes: Palettes,
    pub show_announcement: bool,
    pub announcement_text: String,
    pub links: Links,
    pub features: Features,
}

impl ThemeConfig {
    /// Copy with only the mode changed
    pub fn with_mode(&self, mode: ThemeMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    /// Palette for a resolved mode
    pub fn palette(&self, mode: ResolvedMode) -> &Palette {
        self.palettes.get(mode.palette_key())
    }
}
