//! Live theme session
//!
//! Owns the single configuration value for the lifetime of a session,
//! resolves light/dark against the host preference and pushes the result
//! into a [`StyleSurface`]. Every edit replaces the configuration wholesale,
//! persists it, then re-propagates.

use anyhow::Result;
use std::cell::{Ref, RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::{ResolvedMode, ThemeConfig, ThemeMode};
use crate::error::{ImportError, UsageError};
use crate::persistence::{self, KeyValueStore, ThemeStore};
use crate::preference::PreferenceSignal;
use crate::style::{StyleSurface, apply_theme};

pub struct ThemeSession<S, V> {
    store: ThemeStore<S>,
    surface: V,
    preference: Box<dyn PreferenceSignal>,
    /// Attached only while `config.mode == System`
    listener: Option<watch::Receiver<bool>>,
    prefers_dark: bool,
    config: ThemeConfig,
    resolved_mode: ResolvedMode,
}

impl<S: KeyValueStore, V: StyleSurface> ThemeSession<S, V> {
    /// Load the stored configuration, read the preference once and paint
    pub fn start(
        store: ThemeStore<S>,
        preference: impl PreferenceSignal + 'static,
        surface: V,
    ) -> Self {
        let config = store.load();
        let prefers_dark = preference.prefers_dark();
        let resolved_mode = config.mode.resolve(prefers_dark);

        let mut session = Self {
            store,
            surface,
            preference: Box::new(preference),
            listener: None,
            prefers_dark,
            config,
            resolved_mode,
        };
        session.sync_listener();
        session.propagate();
        info!(mode = %session.config.mode, resolved = %session.resolved_mode, "Theme session started");
        session
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn resolved_mode(&self) -> ResolvedMode {
        self.resolved_mode
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn store(&self) -> &ThemeStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ThemeStore<S> {
        &mut self.store
    }

    /// Whether the preference listener is attached
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Replace the configuration, persist it and re-propagate
    pub fn set_config(&mut self, next: ThemeConfig) {
        self.store.save(&next);
        self.replace(next);
    }

    /// Copy of the current configuration with only `mode` changed
    pub fn set_mode(&mut self, mode: ThemeMode) {
        let next = self.config.with_mode(mode);
        self.set_config(next);
    }

    /// Drop the stored configuration and fall back to the baseline
    pub fn reset(&mut self) {
        self.store.reset();
        let baseline = self.store.load();
        self.replace(baseline);
    }

    pub fn export_json(&self) -> Result<String> {
        persistence::export_json(&self.config)
    }

    pub fn export_to_file(&self, dir: &Path) -> Result<PathBuf> {
        persistence::export_to_file(&self.config, dir)
    }

    /// Import a file and commit it. A failed import leaves the session as is.
    pub async fn import_from_file(&mut self, path: &Path) -> Result<(), ImportError> {
        let next = self.store.import_from_file(path).await?;
        self.set_config(next);
        Ok(())
    }

    /// Apply a pending preference change without blocking.
    /// Returns true when the resolved mode changed.
    pub fn poll_preference(&mut self) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };
        match listener.has_changed() {
            Ok(true) => {
                let prefers_dark = *listener.borrow_and_update();
                self.on_preference(prefers_dark)
            }
            Ok(false) => false,
            Err(_) => {
                debug!("Preference source closed, detaching listener");
                self.listener = None;
                false
            }
        }
    }

    /// Wait for the next preference change. Returns immediately with
    /// `false` when no listener is attached (mode is not `system`).
    pub async fn preference_changed(&mut self) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };
        if listener.changed().await.is_err() {
            debug!("Preference source closed, detaching listener");
            self.listener = None;
            return false;
        }
        let prefers_dark = *listener.borrow_and_update();
        self.on_preference(prefers_dark)
    }

    /// Wrap in a shared cell so the rendering layer can hold handles
    pub fn into_shared(self) -> SharedSession<S, V> {
        SharedSession {
            inner: Rc::new(RefCell::new(self)),
        }
    }

    fn replace(&mut self, next: ThemeConfig) {
        self.config = next;
        self.sync_listener();
        self.resolved_mode = self.config.mode.resolve(self.prefers_dark);
        self.propagate();
    }

    fn sync_listener(&mut self) {
        let wants_listener = self.config.mode == ThemeMode::System;
        match (wants_listener, self.listener.is_some()) {
            (true, false) => {
                let mut listener = self.preference.subscribe();
                self.prefers_dark = *listener.borrow_and_update();
                self.listener = Some(listener);
                debug!(prefers_dark = self.prefers_dark, "Attached preference listener");
            }
            (false, true) => {
                self.listener = None;
                debug!("Detached preference listener");
            }
            _ => {}
        }
    }

    fn on_preference(&mut self, prefers_dark: bool) -> bool {
        self.prefers_dark = prefers_dark;
        let resolved = self.config.mode.resolve(prefers_dark);
        if resolved == self.resolved_mode {
            return false;
        }
        self.resolved_mode = resolved;
        self.propagate();
        true
    }

    fn propagate(&mut self) {
        apply_theme(&mut self.surface, &self.config, self.resolved_mode);
        debug!(resolved = %self.resolved_mode, font = %self.config.font, "Propagated theme");
    }
}

/// Owning side of a session shared with the rendering layer
pub struct SharedSession<S, V> {
    inner: Rc<RefCell<ThemeSession<S, V>>>,
}

impl<S, V> SharedSession<S, V> {
    pub fn handle(&self) -> ThemeHandle<S, V> {
        ThemeHandle {
            session: Rc::downgrade(&self.inner),
        }
    }

    pub fn borrow(&self) -> Ref<'_, ThemeSession<S, V>> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ThemeSession<S, V>> {
        self.inner.borrow_mut()
    }
}

/// What the rendering layer holds: a read view plus replace callbacks.
/// Every call fails with [`UsageError`] once the session has ended.
pub struct ThemeHandle<S, V> {
    session: Weak<RefCell<ThemeSession<S, V>>>,
}

impl<S, V> Clone for ThemeHandle<S, V> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
        }
    }
}

impl<S: KeyValueStore, V: StyleSurface> ThemeHandle<S, V> {
    fn with<R>(&self, f: impl FnOnce(&ThemeSession<S, V>) -> R) -> Result<R, UsageError> {
        let session = self.session.upgrade().ok_or(UsageError::SessionEnded)?;
        let session = session.try_borrow().map_err(|_| UsageError::Busy)?;
        Ok(f(&session))
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut ThemeSession<S, V>) -> R) -> Result<R, UsageError> {
        let session = self.session.upgrade().ok_or(UsageError::SessionEnded)?;
        let mut session = session.try_borrow_mut().map_err(|_| UsageError::Busy)?;
        Ok(f(&mut session))
    }

    pub fn config(&self) -> Result<ThemeConfig, UsageError> {
        self.with(|s| s.config().clone())
    }

    pub fn resolved_mode(&self) -> Result<ResolvedMode, UsageError> {
        self.with(ThemeSession::resolved_mode)
    }

    pub fn set_config(&self, next: ThemeConfig) -> Result<(), UsageError> {
        self.with_mut(|s| s.set_config(next))
    }

    pub fn set_mode(&self, mode: ThemeMode) -> Result<(), UsageError> {
        self.with_mut(|s| s.set_mode(mode))
    }

    pub fn reset(&self) -> Result<(), UsageError> {
        self.with_mut(ThemeSession::reset)
    }

    pub fn export_json(&self) -> Result<String> {
        self.with(ThemeSession::export_json)?
    }

    pub fn export_to_file(&self, dir: &Path) -> Result<PathBuf> {
        self.with(|s| s.export_to_file(dir))?
    }

    /// The file is read without holding the session borrow; the result is
    /// committed only if parsing succeeded.
    pub async fn import_from_file(&self, path: &Path) -> Result<(), ImportError> {
        let baseline = self.with(|s| s.store().baseline().clone())?;
        let next = persistence::import_file(path, &baseline).await?;
        self.set_config(next)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildOverrides, FeatureFlag, default_theme};
    use crate::constants::{self, css};
    use crate::persistence::MemoryStore;
    use crate::preference::SystemPreference;
    use crate::style::CssVariables;

    fn start(prefers_dark: bool) -> (ThemeSession<MemoryStore, CssVariables>, SystemPreference, MemoryStore) {
        let shared = MemoryStore::new();
        let store = ThemeStore::new(shared.clone(), default_theme(&BuildOverrides::default()));
        let preference = SystemPreference::new(prefers_dark);
        let session = ThemeSession::start(store, preference.clone(), CssVariables::new());
        (session, preference, shared)
    }

    #[test]
    fn test_start_applies_resolved_palette() {
        let (session, _, _) = start(true);
        assert_eq!(session.config().mode, ThemeMode::System);
        assert_eq!(session.resolved_mode(), ResolvedMode::Dark);
        assert!(session.is_listening());
        assert_eq!(session.surface().get(css::BACKGROUND), Some("#0b1020"));
        assert_eq!(session.surface().color_scheme(), Some(ResolvedMode::Dark));
    }

    #[test]
    fn test_system_mode_follows_signal() {
        let (mut session, preference, _) = start(true);
        assert_eq!(session.resolved_mode(), ResolvedMode::Dark);

        preference.set_prefers_dark(false);
        assert!(session.poll_preference());
        assert_eq!(session.resolved_mode(), ResolvedMode::Light);
        assert_eq!(session.surface().get(css::BACKGROUND), Some("#f8fafc"));

        // Nothing pending
        assert!(!session.poll_preference());
    }

    #[test]
    fn test_explicit_mode_ignores_signal_and_detaches() {
        let (mut session, preference, _) = start(false);
        assert_eq!(preference.listener_count(), 1);

        session.set_mode(ThemeMode::Light);
        assert!(!session.is_listening());
        assert_eq!(preference.listener_count(), 0);

        let applied = session.surface().apply_count();
        preference.set_prefers_dark(true);
        assert!(!session.poll_preference());
        assert_eq!(session.resolved_mode(), ResolvedMode::Light);
        assert_eq!(session.surface().apply_count(), applied);
    }

    #[test]
    fn test_returning_to_system_rereads_signal() {
        let (mut session, preference, _) = start(false);
        session.set_mode(ThemeMode::Light);
        preference.set_prefers_dark(true);

        session.set_mode(ThemeMode::System);
        assert!(session.is_listening());
        assert_eq!(session.resolved_mode(), ResolvedMode::Dark);
    }

    #[test]
    fn test_set_config_persists_and_propagates() {
        let (mut session, _, shared) = start(false);
        let mut next = session.config().clone();
        next.accent = "#ff5500".to_string();
        next.features.set(FeatureFlag::Insights, false);
        session.set_config(next.clone());

        assert_eq!(session.config(), &next);
        assert_eq!(session.surface().get(css::ACCENT), Some("#ff5500"));
        let stored = shared.get(constants::storage::THEME_KEY).unwrap().unwrap();
        assert_eq!(session.store().import_from_str(&stored).unwrap(), next);
    }

    #[test]
    fn test_set_mode_changes_only_mode() {
        let (mut session, _, _) = start(false);
        let before = session.config().clone();
        session.set_mode(ThemeMode::Dark);
        assert_eq!(session.config(), &before.with_mode(ThemeMode::Dark));
        assert_eq!(session.resolved_mode(), ResolvedMode::Dark);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let (mut session, _, shared) = start(false);
        let mut next = session.config().clone();
        next.title = "Changed".to_string();
        session.set_config(next);

        session.reset();
        assert_eq!(session.config(), session.store().baseline());
        assert!(shared.get(constants::storage::THEME_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_import_leaves_config_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "<html>not json</html>").unwrap();

        let (mut session, _, _) = start(false);
        let before = session.config().clone();
        let err = session.import_from_file(&path).await.unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
        assert_eq!(session.config(), &before);
    }

    #[tokio::test]
    async fn test_preference_changed_waits_for_signal() {
        let (mut session, preference, _) = start(false);
        preference.set_prefers_dark(true);
        assert!(session.preference_changed().await);
        assert_eq!(session.resolved_mode(), ResolvedMode::Dark);

        session.set_mode(ThemeMode::Dark);
        assert!(!session.preference_changed().await);
    }

    #[test]
    fn test_handle_errors_after_session_ends() {
        let (session, _, _) = start(false);
        let shared = session.into_shared();
        let handle = shared.handle();

        handle.set_mode(ThemeMode::Dark).unwrap();
        assert_eq!(handle.resolved_mode(), Ok(ResolvedMode::Dark));
        assert_eq!(handle.config().unwrap().mode, ThemeMode::Dark);

        drop(shared);
        assert_eq!(handle.config().unwrap_err(), UsageError::SessionEnded);
        assert_eq!(handle.set_mode(ThemeMode::Light), Err(UsageError::SessionEnded));
    }

    #[test]
    fn test_handle_reports_reentrant_access() {
        let (session, _, _) = start(false);
        let shared = session.into_shared();
        let handle = shared.handle();

        let _guard = shared.borrow_mut();
        assert_eq!(handle.resolved_mode(), Err(UsageError::Busy));
    }

    #[test]
    fn test_handle_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _, _) = start(false);
        let shared = session.into_shared();
        let handle = shared.handle();

        let path = handle.export_to_file(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(constants::export::FILENAME));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), handle.export_json().unwrap());

        drop(shared);
        let err = handle.export_to_file(dir.path()).unwrap_err();
        assert_eq!(err.downcast_ref::<UsageError>(), Some(&UsageError::SessionEnded));
    }

    #[tokio::test]
    async fn test_handle_import_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _, _) = start(false);
        let mut edited = session.config().clone();
        edited.announcement_text = "Exported".to_string();
        session.set_config(edited.clone());
        let path = session.export_to_file(dir.path()).unwrap();
        session.reset();

        let shared = session.into_shared();
        let handle = shared.handle();
        handle.import_from_file(&path).await.unwrap();
        assert_eq!(handle.config().unwrap(), edited);
    }
}
