//! Headless map widget
//!
//! Keeps the widget state (centre, zoom, markers) in memory. The server hands
//! it to the browser page, which mirrors it on the real map.

use crate::config::MapConfig;
use crate::coord::Coordinates;
use crate::map::{MapWidget, MarkerId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A marker placed on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Coordinates,
    pub title: String,
}

/// In-memory map widget state
#[derive(Debug, Clone, Serialize)]
pub struct Viewport {
    pub map_id: String,
    pub center: Coordinates,
    pub zoom: u8,
    #[serde(serialize_with = "serialize_markers")]
    markers: BTreeMap<MarkerId, Marker>,
    #[serde(skip)]
    next_marker: u64,
}

fn serialize_markers<S: serde::Serializer>(
    markers: &BTreeMap<MarkerId, Marker>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(markers.values())
}

impl Viewport {
    pub fn new(map_id: impl Into<String>, center: Coordinates, zoom: u8) -> Self {
        Self {
            map_id: map_id.into(),
            center,
            zoom,
            markers: BTreeMap::new(),
            next_marker: 0,
        }
    }

    /// Initial view from the `[map]` config section
    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(
            config.map_id.clone(),
            Coordinates::new(config.initial_lat, config.initial_lng),
            config.initial_zoom,
        )
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&MapConfig::default())
    }
}

impl MapWidget for Viewport {
    fn pan_to(&mut self, point: Coordinates) {
        self.center = point;
    }

    fn add_marker(&mut self, position: Coordinates, title: &str) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(
            id,
            Marker {
                id,
                position,
                title: title.to_string(),
            },
        );
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }
}
