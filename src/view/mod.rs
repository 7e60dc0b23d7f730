//! Presentation
//!
//! Pure projections of controller, map and credential state into what the
//! page (or terminal) shows. Nothing here decides anything; all rules live
//! in the controller.

pub mod text;

use crate::config::Credentials;
use crate::controller::{Controller, Phase};
use crate::describe::{DetailError, DetailErrorKind};
use crate::map::readiness::MapStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const HINT_SELECT: &str = "Click on the map to select a location.";
pub const HINT_DETAILS: &str = "Details about the selected location will appear here once fetched.";
pub const LOADING_DETAILS: &str = "Fetching details...";
pub const LOADING_MAP: &str = "Loading Map...";
pub const MAP_NEEDS_KEY: &str = "Map cannot be loaded. Please provide a Google Maps API key.";
const ERROR_ADVICE: &str = "Ensure your Gemini API key is correctly configured.";

const BANNER_MAP_KEY: &str = "Action Required: set map.api_key in the config file \
     (or GOOGLE_MAPS_API_KEY) to a Google Maps JavaScript API key to enable the map.";
const BANNER_GEMINI_KEY: &str = "Action Required: set gemini.api_key in the config file \
     (or GEMINI_API_KEY) to a Gemini API key to enable location details.";

/// The action control (button)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub label: String,
    pub enabled: bool,
    /// Visual "active" styling
    pub active: bool,
}

/// The result panel next to the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelView {
    pub phase: Phase,
    /// Persistent configuration banners; retries do not clear them
    pub banners: Vec<String>,
    pub location_label: Option<String>,
    pub hint: Option<String>,
    pub info_paragraphs: Vec<String>,
    pub loading: Option<String>,
    pub error: Option<String>,
    pub error_kind: Option<DetailErrorKind>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub action: ActionView,
}

/// The map area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPane {
    pub status: MapStatus,
    /// Shown instead of the map while it is not ready
    pub message: Option<String>,
}

impl PanelView {
    pub fn project(controller: &Controller, credentials: &Credentials) -> Self {
        let mut banners = Vec::new();
        if !credentials.map.is_configured() {
            banners.push(BANNER_MAP_KEY.to_string());
        }
        if !credentials.gemini.is_configured() {
            banners.push(BANNER_GEMINI_KEY.to_string());
        }

        let selection = controller.selection();
        let info_paragraphs: Vec<String> = controller
            .text()
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let hint = match (selection, info_paragraphs.is_empty()) {
            (None, _) => Some(HINT_SELECT),
            (Some(_), true) if controller.phase() == Phase::Selected => Some(HINT_DETAILS),
            _ => None,
        }
        .map(str::to_string);

        let error = controller.error();
        let enabled = controller.can_request();

        Self {
            phase: controller.phase(),
            banners,
            location_label: selection.map(|c| c.label()),
            hint,
            info_paragraphs,
            loading: controller.is_pending().then(|| LOADING_DETAILS.to_string()),
            error: error.map(failure_message),
            error_kind: error.map(|e| e.kind()),
            resolved_at: controller.resolved_at(),
            action: ActionView {
                label: controller.action_label().to_string(),
                enabled,
                active: controller.is_active(),
            },
        }
    }
}

fn failure_message(error: &DetailError) -> String {
    let message = error.to_string();
    format!(
        "Failed to fetch information: {}. {}",
        message.trim_end_matches('.'),
        ERROR_ADVICE
    )
}

impl MapPane {
    pub fn project(status: MapStatus) -> Self {
        let message = match status {
            MapStatus::Ready => None,
            MapStatus::Loading => Some(LOADING_MAP.to_string()),
            MapStatus::NeedsConfiguration => Some(MAP_NEEDS_KEY.to_string()),
        };
        Self { status, message }
    }
}
