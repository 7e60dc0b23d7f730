//! Centralized constants for the geo-explorer crate
//!
//! Values shared between the config, describe, map and server modules.

/// External API endpoints
pub mod api {
    /// Gemini REST API root (v1beta carries `generateContent`)
    pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Header carrying the Gemini API key
    pub const GEMINI_KEY_HEADER: &str = "x-goog-api-key";
}

/// Placeholder credential values shipped in sample configs.
///
/// A key equal to one of these is treated exactly like a missing key.
pub mod placeholders {
    pub const MAP_API_KEY: &str = "YOUR_GOOGLE_MAPS_API_KEY";
    pub const GEMINI_API_KEY: &str = "YOUR_ACTUAL_GEMINI_API_KEY";
}

/// Environment variables that override config file values
pub mod env {
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const MAP_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
}

/// Marker title used for the current selection
pub const SELECTION_MARKER_TITLE: &str = "Selected Location";
