//! Theme and feature-flag configuration for a branded mini app
//!
//! - [`config`]: schema, baseline and normalization of theme documents
//! - [`persistence`]: key-value storage, load/save/reset, export/import
//! - [`session`]: live configuration, light/dark resolution and propagation
//! - [`style`]: the styling surface resolved values are written to
//! - [`preference`]: host "prefers dark" signal
//! - [`admin`], [`sdk`]: cosmetic admin gate and optional host SDK bridge

#![forbid(unsafe_code)]

pub mod admin;
pub mod config;
pub mod constants;
pub mod error;
pub mod persistence;
pub mod preference;
pub mod sdk;
pub mod session;
pub mod style;

pub use config::{FeatureFlag, FontChoice, ResolvedMode, ThemeConfig, ThemeMode};
pub use error::{ImportError, LoginError, UsageError};
pub use persistence::{FileStore, KeyValueStore, MemoryStore, ThemeStore};
pub use preference::{PreferenceSignal, SystemPreference};
pub use session::{SharedSession, ThemeHandle, ThemeSession};
pub use style::{CssVariables, StyleSurface};
