//! Host "prefers dark" signal
//!
//! The host owns a [`SystemPreference`] and publishes changes to it; a theme
//! session subscribes only while its mode is `system`.

use std::env;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::constants;

/// Source of the host's light/dark preference
pub trait PreferenceSignal {
    /// Current value
    fn prefers_dark(&self) -> bool;

    /// Receiver notified on every change. Dropping it detaches the listener.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Watch-channel backed preference. Clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct SystemPreference {
    tx: Arc<watch::Sender<bool>>,
}

impl SystemPreference {
    pub fn new(prefers_dark: bool) -> Self {
        let (tx, _rx) = watch::channel(prefers_dark);
        Self { tx: Arc::new(tx) }
    }

    /// Read the desktop preference once from the environment
    pub fn detect() -> Self {
        let prefers_dark = detect_prefers_dark();
        info!(prefers_dark, "Detected system color scheme");
        Self::new(prefers_dark)
    }

    /// Publish a new value; listeners are only woken when it changes
    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == prefers_dark {
                false
            } else {
                *current = prefers_dark;
                true
            }
        });
        if changed {
            debug!(prefers_dark, listeners = self.tx.receiver_count(), "System color scheme changed");
        }
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl PreferenceSignal for SystemPreference {
    fn prefers_dark(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// `MINIAPP_COLOR_SCHEME` wins; otherwise a `GTK_THEME` ending in `:dark`
/// means dark. Anything else is light.
fn detect_prefers_dark() -> bool {
    let explicit = env::var(constants::env::COLOR_SCHEME).ok();
    let gtk_theme = env::var(constants::env::GTK_THEME).ok();
    prefers_dark_from(explicit.as_deref(), gtk_theme.as_deref())
}

fn prefers_dark_from(explicit: Option<&str>, gtk_theme: Option<&str>) -> bool {
    if let Some(scheme) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return scheme.eq_ignore_ascii_case("dark");
    }
    gtk_theme.is_some_and(|theme| theme.to_ascii_lowercase().ends_with(":dark"))
}
