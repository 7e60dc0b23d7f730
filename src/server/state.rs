//! Server shared state
//!
//! One session per server process: the page in the browser is the single
//! user of the map.

use crate::config::{Config, Credentials};
use crate::controller::{Controller, Session};
use crate::describe::LocationDetailService;
use crate::map::{MapAdapter, MapRuntime, Viewport};
use crate::view::{MapPane, PanelView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state for the HTTP server
pub struct AppState<S> {
    /// Configuration (read-only after startup)
    pub config: Config,

    /// Credential check performed once at startup
    pub credentials: Credentials,

    /// Readiness of the browser map runtime
    pub map_runtime: MapRuntime,

    pub session: Arc<Session<S, Viewport>>,
}

/// Full page projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub panel: PanelView,
    pub map: MapPane,
}

impl<S: LocationDetailService + 'static> AppState<S> {
    /// Wire up the session from config and an injected detail service
    pub fn new(config: Config, service: S) -> Self {
        let credentials = config.credentials();
        let map_runtime = MapRuntime::new(credentials.map);
        let map = MapAdapter::new(Viewport::from_config(&config.map), map_runtime.subscribe());
        let controller = Controller::new(credentials.map.is_configured());
        let session = Arc::new(Session::new(controller, map, Arc::new(service)));

        Self {
            config,
            credentials,
            map_runtime,
            session,
        }
    }

    /// Current page projection
    pub async fn page_view(&self) -> PageView {
        let controller = self.session.controller().await;
        PageView {
            panel: PanelView::project(&controller, &self.credentials),
            map: MapPane::project(self.map_runtime.status()),
        }
    }
}
