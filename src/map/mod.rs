//! Map adapter
//!
//! Wraps an interactive map widget behind [`MapWidget`]. The adapter turns
//! clicks into validated [`Coordinates`], keeps at most one marker on the
//! map, and recentres the view on each new selection.

pub mod readiness;
pub mod viewport;

use crate::constants::SELECTION_MARKER_TITLE;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use readiness::{MapStatus, Readiness};
use serde::Serialize;

pub use readiness::MapRuntime;
pub use viewport::Viewport;

/// Handle of a marker placed on a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MarkerId(pub u64);

/// Operations the adapter needs from a map widget
pub trait MapWidget: Send + Sync {
    /// Recentre the view on a point
    fn pan_to(&mut self, point: Coordinates);

    /// Place a marker and return its handle
    fn add_marker(&mut self, position: Coordinates, title: &str) -> MarkerId;

    /// Remove a marker; unknown handles are ignored
    fn remove_marker(&mut self, id: MarkerId);
}

/// Single-marker adapter over a map widget
#[derive(Debug)]
pub struct MapAdapter<W> {
    widget: W,
    marker: Option<MarkerId>,
    readiness: Readiness,
}

impl<W: MapWidget> MapAdapter<W> {
    pub fn new(widget: W, readiness: Readiness) -> Self {
        Self {
            widget,
            marker: None,
            readiness,
        }
    }

    pub fn status(&self) -> MapStatus {
        self.readiness.status()
    }

    /// Turn a click on the widget into coordinates
    ///
    /// Clicks are only meaningful once the widget is rendered, so this fails
    /// with `MapUnavailable` before readiness.
    pub fn report_click(&self, lat: f64, lng: f64) -> Result<Coordinates> {
        match self.status() {
            MapStatus::Ready => {}
            MapStatus::Loading => {
                return Err(Error::MapUnavailable("map is still loading".to_string()))
            }
            MapStatus::NeedsConfiguration => {
                return Err(Error::MapUnavailable(
                    "map API key is missing or a placeholder".to_string(),
                ))
            }
        }

        let coords = Coordinates::new(lat, lng);
        coords.validate()?;
        Ok(coords)
    }

    /// Move the single marker to `point` and recentre on it
    pub fn show_selection(&mut self, point: Coordinates) {
        self.clear_marker();
        self.marker = Some(self.widget.add_marker(point, SELECTION_MARKER_TITLE));
        self.widget.pan_to(point);
    }

    /// Remove the marker, if any
    pub fn clear_marker(&mut self) {
        if let Some(id) = self.marker.take() {
            self.widget.remove_marker(id);
        }
    }

    pub fn marker(&self) -> Option<MarkerId> {
        self.marker
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialStatus;

    fn ready_adapter() -> (MapRuntime, MapAdapter<Viewport>) {
        let runtime = MapRuntime::new(CredentialStatus::Configured);
        runtime.signal_ready();
        let adapter = MapAdapter::new(Viewport::default(), runtime.subscribe());
        (runtime, adapter)
    }

    #[test]
    fn test_click_before_ready_rejected() {
        let runtime = MapRuntime::new(CredentialStatus::Configured);
        let adapter = MapAdapter::new(Viewport::default(), runtime.subscribe());

        let err = adapter.report_click(10.0, 10.0).unwrap_err();
        assert!(matches!(err, Error::MapUnavailable(_)));
    }

    #[test]
    fn test_click_without_configuration_rejected() {
        let runtime = MapRuntime::new(CredentialStatus::Placeholder);
        runtime.signal_ready();
        let adapter = MapAdapter::new(Viewport::default(), runtime.subscribe());

        assert!(adapter.report_click(10.0, 10.0).is_err());
    }

    #[test]
    fn test_click_reports_coordinates() {
        let (_runtime, adapter) = ready_adapter();
        let coords = adapter.report_click(48.8566, 2.3522).unwrap();
        assert_eq!(coords, Coordinates::new(48.8566, 2.3522));
    }

    #[test]
    fn test_click_out_of_range() {
        let (_runtime, adapter) = ready_adapter();
        let err = adapter.report_click(95.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidCoordinates(_)));
    }

    #[test]
    fn test_single_marker_follows_selection() {
        let (_runtime, mut adapter) = ready_adapter();

        adapter.show_selection(Coordinates::new(48.8566, 2.3522));
        adapter.show_selection(Coordinates::new(35.6762, 139.6503));

        let viewport = adapter.widget();
        assert_eq!(viewport.marker_count(), 1);
        let marker = viewport.markers().next().unwrap();
        assert_eq!(marker.position, Coordinates::new(35.6762, 139.6503));
        assert_eq!(marker.title, "Selected Location");
        assert_eq!(Some(marker.id), adapter.marker());
        assert_eq!(viewport.center, Coordinates::new(35.6762, 139.6503));
    }

    #[test]
    fn test_clear_marker() {
        let (_runtime, mut adapter) = ready_adapter();
        adapter.show_selection(Coordinates::new(1.0, 2.0));

        adapter.clear_marker();
        assert_eq!(adapter.marker(), None);
        assert_eq!(adapter.widget().marker_count(), 0);

        // Clearing twice is a no-op
        adapter.clear_marker();
    }
}
