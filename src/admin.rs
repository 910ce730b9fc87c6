//! Admin gate for the theme editor
//!
//! Cosmetic only: the passcode is compiled into the binary, so anyone with
//! the binary can read it. It keeps casual visitors out of the editor and
//! nothing more.

use tracing::{error, info, warn};

use crate::config::BuildOverrides;
use crate::constants::storage::{ADMIN_SESSION_KEY, ADMIN_SESSION_OK};
use crate::error::LoginError;
use crate::persistence::KeyValueStore;

pub struct AdminGate<S> {
    session: S,
    passcode: String,
}

impl<S: KeyValueStore> AdminGate<S> {
    pub fn new(session: S, overrides: &BuildOverrides) -> Self {
        Self {
            session,
            passcode: overrides.admin_passcode().to_string(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        match self.session.get(ADMIN_SESSION_KEY) {
            Ok(value) => value.as_deref() == Some(ADMIN_SESSION_OK),
            Err(e) => {
                warn!(error = ?e, "Failed to read admin session flag");
                false
            }
        }
    }

    pub fn login(&mut self, passcode: &str) -> Result<(), LoginError> {
        if passcode.is_empty() {
            return Err(LoginError::Empty);
        }
        if passcode != self.passcode {
            warn!("Admin login rejected");
            return Err(LoginError::Wrong);
        }
        if let Err(e) = self.session.set(ADMIN_SESSION_KEY, ADMIN_SESSION_OK) {
            error!(error = ?e, "Failed to store admin session flag");
        }
        info!("Admin unlocked");
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.remove(ADMIN_SESSION_KEY) {
            error!(error = ?e, "Failed to clear admin session flag");
        }
        info!("Admin locked");
    }
}
