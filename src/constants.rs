//! Application-wide constants
//!
//! Storage keys, file names and environment variable names used throughout
//! the crate, kept in one place so the persisted layout is easy to audit.

/// Key-value storage keys
pub mod storage {
    /// Key holding the serialized theme configuration
    pub const THEME_KEY: &str = "miniapp_theme_v1";

    /// Key holding the editor's auto-apply toggle ("true"/"false")
    pub const AUTO_APPLY_KEY: &str = "miniapp_theme_auto_apply_v1";

    /// Key holding the admin gate session flag
    pub const ADMIN_SESSION_KEY: &str = "miniapp_admin_session_v1";

    /// Value stored under ADMIN_SESSION_KEY once the gate is unlocked
    pub const ADMIN_SESSION_OK: &str = "ok";
}

/// On-disk locations
pub mod config {
    /// Directory under the platform config/cache dir
    pub const APP_DIR: &str = "miniapp-theme-kit";

    /// Extension used by the file-backed store for each key
    pub const STORE_EXTENSION: &str = "json";
}

/// Export file naming
pub mod export {
    /// Fixed filename offered for theme downloads
    pub const FILENAME: &str = "miniapp-theme.json";
}

/// Environment variables
pub mod env {
    /// Explicit color scheme for the preference signal ("light" or "dark")
    pub const COLOR_SCHEME: &str = "MINIAPP_COLOR_SCHEME";

    /// GTK theme name; a ":dark" suffix means the desktop prefers dark
    pub const GTK_THEME: &str = "GTK_THEME";

    /// Log level for the CLI subscriber
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

/// CSS custom property names written to the style surface
pub mod css {
    pub const BACKGROUND: &str = "--bg";
    pub const PANEL: &str = "--panel";
    pub const PANEL_MUTED: &str = "--panel-muted";
    pub const TEXT: &str = "--text";
    pub const MUTED: &str = "--muted";
    pub const BORDER: &str = "--border";
    pub const RING: &str = "--ring";
    pub const SHADOW: &str = "--shadow-color";
    pub const ACCENT: &str = "--accent";
    pub const ACCENT_FOREGROUND: &str = "--accent-foreground";
    pub const FONT: &str = "--font";
}
