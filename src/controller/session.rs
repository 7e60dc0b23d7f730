//! Async driver for the controller
//!
//! A session owns the controller and the map adapter behind one lock, so a
//! selection updates the controller, the marker and the view centre in a
//! single step. Fetches run in spawned tasks; the UI side keeps accepting
//! selections while they are in flight.

use crate::controller::{Controller, Resolution};
use crate::coord::Coordinates;
use crate::describe::LocationDetailService;
use crate::error::Result;
use crate::map::{MapAdapter, MapWidget};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct SessionState<W> {
    controller: Controller,
    map: MapAdapter<W>,
}

/// Consistent copy of session state for presentation
#[derive(Debug, Clone)]
pub struct SessionSnapshot<W> {
    pub controller: Controller,
    pub widget: W,
}

/// One user's selection/fetch session
pub struct Session<S, W> {
    state: RwLock<SessionState<W>>,
    service: Arc<S>,
}

impl<S, W> Session<S, W>
where
    S: LocationDetailService + 'static,
    W: MapWidget + 'static,
{
    pub fn new(controller: Controller, map: MapAdapter<W>, service: Arc<S>) -> Self {
        Self {
            state: RwLock::new(SessionState { controller, map }),
            service,
        }
    }

    /// Handle a click on the map
    ///
    /// Fails before the map is ready or for out-of-range input; otherwise
    /// the click always becomes the new selection, even mid-fetch.
    pub async fn select(&self, lat: f64, lng: f64) -> Result<Coordinates> {
        let mut state = self.state.write().await;
        let coords = state.map.report_click(lat, lng)?;

        state.controller.select(coords);
        state.map.show_selection(coords);
        info!(%coords, "location selected");
        Ok(coords)
    }

    /// Request details for the current selection
    ///
    /// Returns `None` without calling the service when the action is
    /// disabled. The returned handle resolves once the outcome has been
    /// applied or discarded.
    pub async fn request_details(self: &Arc<Self>) -> Option<JoinHandle<Resolution>> {
        let ticket = {
            let mut state = self.state.write().await;
            match state.controller.begin_request() {
                Some(ticket) => ticket,
                None => {
                    debug!(phase = ?state.controller.phase(), "details request ignored");
                    return None;
                }
            }
        };

        info!(coords = %ticket.coords(), "fetching location details");
        let session = Arc::clone(self);
        Some(tokio::spawn(async move {
            let outcome = session.service.fetch_description(ticket.coords()).await;
            let resolution = session.state.write().await.controller.complete(ticket, outcome);
            if resolution == Resolution::Discarded {
                debug!(coords = %ticket.coords(), "stale location details dropped");
            }
            resolution
        }))
    }

    /// Read controller and widget state under one lock
    pub async fn snapshot(&self) -> SessionSnapshot<W>
    where
        W: Clone,
    {
        let state = self.state.read().await;
        SessionSnapshot {
            controller: state.controller.clone(),
            widget: state.map.widget().clone(),
        }
    }

    pub async fn controller(&self) -> Controller {
        self.state.read().await.controller.clone()
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}
