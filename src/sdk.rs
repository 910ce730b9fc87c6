//! Optional host SDK bridge
//!
//! A mini app may run inside a host client that injects its own SDK, or on
//! its own with nothing injected. The app talks to the host through
//! [`HostBridge`], whose calls never fail: a missing host is [`NullSdk`],
//! and host errors are logged and swallowed here.

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

/// User reported by the host, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostProfile {
    pub fid: Option<u64>,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

/// Capabilities a host environment may provide
pub trait HostSdk {
    /// Tell the host the app has finished loading
    fn ready(&self) -> Result<()>;

    /// Current user context, `None` when the host has none
    fn context(&self) -> Result<Option<HostProfile>>;

    fn send_event(&self, kind: &str, payload: Option<&Value>) -> Result<()>;
}

/// No host present
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSdk;

impl HostSdk for NullSdk {
    fn ready(&self) -> Result<()> {
        Ok(())
    }

    fn context(&self) -> Result<Option<HostProfile>> {
        Ok(None)
    }

    fn send_event(&self, _kind: &str, _payload: Option<&Value>) -> Result<()> {
        Ok(())
    }
}

pub struct HostBridge {
    sdk: Box<dyn HostSdk>,
}

impl Default for HostBridge {
    fn default() -> Self {
        Self::new(NullSdk)
    }
}

impl HostBridge {
    pub fn new(sdk: impl HostSdk + 'static) -> Self {
        Self { sdk: Box::new(sdk) }
    }

    pub fn ready(&self) {
        if let Err(e) = self.sdk.ready() {
            debug!(error = ?e, "Host ready call failed");
        }
    }

    /// Host user, or an empty profile when unavailable
    pub fn profile(&self) -> HostProfile {
        match self.sdk.context() {
            Ok(profile) => profile.unwrap_or_default(),
            Err(e) => {
                debug!(error = ?e, "Host context unavailable");
                HostProfile::default()
            }
        }
    }

    pub fn emit(&self, kind: &str, payload: Option<&Value>) {
        if let Err(e) = self.sdk.send_event(kind, payload) {
            debug!(kind = %kind, error = ?e, "Host event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FailingSdk;

    impl HostSdk for FailingSdk {
        fn ready(&self) -> Result<()> {
            Err(anyhow!("no host"))
        }

        fn context(&self) -> Result<Option<HostProfile>> {
            Err(anyhow!("no host"))
        }

        fn send_event(&self, _kind: &str, _payload: Option<&Value>) -> Result<()> {
            Err(anyhow!("no host"))
        }
    }

    #[derive(Default)]
    struct RecordingSdk {
        events: Rc<RefCell<Vec<(String, Option<Value>)>>>,
    }

    impl HostSdk for RecordingSdk {
        fn ready(&self) -> Result<()> {
            Ok(())
        }

        fn context(&self) -> Result<Option<HostProfile>> {
            Ok(Some(HostProfile {
                fid: Some(42),
                username: Some("alice".to_string()),
                display_name: None,
            }))
        }

        fn send_event(&self, kind: &str, payload: Option<&Value>) -> Result<()> {
            self.events
                .borrow_mut()
                .push((kind.to_string(), payload.cloned()));
            Ok(())
        }
    }

    #[test]
    fn test_null_sdk_is_empty() {
        let bridge = HostBridge::default();
        bridge.ready();
        bridge.emit("theme_saved", None);
        assert_eq!(bridge.profile(), HostProfile::default());
    }

    #[test]
    fn test_failures_are_swallowed() {
        let bridge = HostBridge::new(FailingSdk);
        bridge.ready();
        bridge.emit("theme_saved", Some(&json!({ "mode": "dark" })));
        assert_eq!(bridge.profile(), HostProfile::default());
    }

    #[test]
    fn test_events_forwarded() {
        let sdk = RecordingSdk::default();
        let events = sdk.events.clone();
        let bridge = HostBridge::new(sdk);

        bridge.emit("theme_saved", Some(&json!({ "mode": "dark" })));
        assert_eq!(bridge.profile().fid, Some(42));
        assert_eq!(
            events.borrow().as_slice(),
            &[("theme_saved".to_string(), Some(json!({ "mode": "dark" })))]
        );
    }
}
