//! Map runtime readiness
//!
//! The widget runtime (the browser's map script) becomes available some time
//! after startup. Instead of polling a global, components receive a
//! [`Readiness`] handle and either read the current [`MapStatus`] or await it.
//!
//! A missing or placeholder map key pins the status to
//! `NeedsConfiguration` for the lifetime of the runtime.

use crate::config::CredentialStatus;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

/// Availability of the map widget runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStatus {
    /// Credential present, runtime not loaded yet
    Loading,
    /// Runtime loaded, map may be rendered and clicked
    Ready,
    /// Credential missing or placeholder; the map will never load
    NeedsConfiguration,
}

impl MapStatus {
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

/// Owner side of the readiness signal
#[derive(Debug)]
pub struct MapRuntime {
    tx: watch::Sender<MapStatus>,
}

impl MapRuntime {
    /// Create a runtime for a map credential checked at startup
    pub fn new(credential: CredentialStatus) -> Self {
        let initial = if credential.is_configured() {
            MapStatus::Loading
        } else {
            warn!(%credential, "map API key not usable; map will not be loaded");
            MapStatus::NeedsConfiguration
        };
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Report that the widget runtime has loaded
    ///
    /// Returns the resulting status. Has no effect once configuration is
    /// known to be missing.
    pub fn signal_ready(&self) -> MapStatus {
        self.tx.send_if_modified(|status| match status {
            MapStatus::Loading => {
                *status = MapStatus::Ready;
                info!("map runtime ready");
                true
            }
            MapStatus::Ready | MapStatus::NeedsConfiguration => false,
        });
        self.status()
    }

    pub fn status(&self) -> MapStatus {
        *self.tx.borrow()
    }

    /// Hand out a readiness capability
    pub fn subscribe(&self) -> Readiness {
        Readiness {
            rx: self.tx.subscribe(),
        }
    }
}

/// Consumer side of the readiness signal
#[derive(Debug, Clone)]
pub struct Readiness {
    rx: watch::Receiver<MapStatus>,
}

impl Readiness {
    pub fn status(&self) -> MapStatus {
        *self.rx.borrow()
    }

    /// Wait until the runtime leaves `Loading`
    ///
    /// Resolves to `Ok` once ready, or `Error::MapUnavailable` when the map
    /// cannot load (configuration needed, or the runtime was dropped while
    /// still loading).
    pub async fn ready(&mut self) -> Result<()> {
        let status = self
            .rx
            .wait_for(|status| *status != MapStatus::Loading)
            .await
            .map(|status| *status)
            .map_err(|_| Error::MapUnavailable("map runtime shut down before loading".to_string()))?;

        match status {
            MapStatus::Ready => Ok(()),
            _ => Err(Error::MapUnavailable(
                "map API key is missing or a placeholder".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_configured_starts_loading() {
        let runtime = MapRuntime::new(CredentialStatus::Configured);
        assert_eq!(runtime.status(), MapStatus::Loading);
        assert_eq!(runtime.subscribe().status(), MapStatus::Loading);
    }

    #[test]
    fn test_signal_ready() {
        let runtime = MapRuntime::new(CredentialStatus::Configured);
        let readiness = runtime.subscribe();

        assert_eq!(runtime.signal_ready(), MapStatus::Ready);
        assert!(readiness.status().is_ready());

        // Repeated signals are harmless
        assert_eq!(runtime.signal_ready(), MapStatus::Ready);
    }

    #[test]
    fn test_placeholder_is_permanent() {
        let runtime = MapRuntime::new(CredentialStatus::Placeholder);
        assert_eq!(runtime.status(), MapStatus::NeedsConfiguration);

        assert_eq!(runtime.signal_ready(), MapStatus::NeedsConfiguration);
        assert_eq!(runtime.subscribe().status(), MapStatus::NeedsConfiguration);
    }

    #[test]
    fn test_missing_is_permanent() {
        let runtime = MapRuntime::new(CredentialStatus::Missing);
        runtime.signal_ready();
        assert_eq!(runtime.status(), MapStatus::NeedsConfiguration);
    }

    #[tokio::test]
    async fn test_ready_future_resolves_after_signal() {
        let runtime = MapRuntime::new(CredentialStatus::Configured);
        let mut readiness = runtime.subscribe();

        let waiter = tokio::spawn(async move { readiness.ready().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        runtime.signal_ready();
        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_ready_future_fails_without_configuration() {
        let runtime = MapRuntime::new(CredentialStatus::Placeholder);
        let mut readiness = runtime.subscribe();

        let err = readiness.ready().await.unwrap_err();
        assert!(matches!(err, Error::MapUnavailable(_)));
    }

    #[tokio::test]
    async fn test_ready_future_fails_when_runtime_dropped() {
        let runtime = MapRuntime::new(CredentialStatus::Configured);
        let mut readiness = runtime.subscribe();
        drop(runtime);

        assert!(readiness.ready().await.is_err());
    }
}
