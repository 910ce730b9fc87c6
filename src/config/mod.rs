//! Theme configuration for the mini app
//!
//! - **schema**: shape of a valid configuration (palettes, links, feature flags)
//! - **defaults**: the baseline configuration and build-time overrides
//! - **migrate**: normalization of stored/imported documents against the baseline

pub mod defaults;
pub mod migrate;
pub mod schema;

// Re-export commonly used types
pub use defaults::{BuildOverrides, default_theme};
pub use migrate::normalize;
pub use schema::{
    FeatureFlag, Features, FontChoice, Links, Palette, PaletteKey, Palettes, ResolvedMode,
    ThemeConfig, ThemeMode,
};
