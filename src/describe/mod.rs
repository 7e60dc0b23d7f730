//! Location detail service
//!
//! Turns a point on the map into a few sentences of prose. The only
//! production backend is Gemini (`gemini.rs`); the controller only sees the
//! [`LocationDetailService`] trait so the backend is injected, not looked up.
//!
//! ## Failure classification
//!
//! Backends report failures as free text. [`DetailError::classify`] sorts that
//! text into user-facing kinds by looking for known substrings. This is a
//! heuristic: the upstream API does not promise stable wording, and anything
//! that does not match falls back to [`DetailError::Unknown`] carrying the
//! original description.

pub mod gemini;

#[cfg(test)]
pub mod scripted;

use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Substrings that identify a rejected or malformed API key
const AUTH_MARKERS: &[&str] = &["API key not valid", "API_KEY_INVALID", "API key is not valid"];

/// Substrings that identify quota or rate limiting (matched case-insensitively)
const QUOTA_MARKERS: &[&str] = &["quota", "resource_exhausted"];

/// Why a description could not be produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetailError {
    #[error("Gemini API key is not configured. Set gemini.api_key in the config file or GEMINI_API_KEY.")]
    ConfigurationMissing,

    #[error("Invalid or missing Gemini API key. Please check your configuration.")]
    AuthFailure,

    #[error("Gemini API quota exceeded. Please check your usage or billing.")]
    QuotaExceeded,

    #[error("Received an empty response from Gemini API.")]
    EmptyResponse,

    #[error("Could not retrieve information for the selected location. {0}")]
    Unknown(String),
}

/// Stable identifier for each failure kind (used in JSON responses)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetailErrorKind {
    ConfigurationMissing,
    AuthFailure,
    QuotaExceeded,
    EmptyResponse,
    Unknown,
}

impl DetailError {
    /// Classify a failure description by known substrings
    pub fn classify(description: &str) -> Self {
        if AUTH_MARKERS.iter().any(|m| description.contains(m)) {
            return Self::AuthFailure;
        }

        let lowered = description.to_lowercase();
        if QUOTA_MARKERS.iter().any(|m| lowered.contains(m)) {
            return Self::QuotaExceeded;
        }

        let description = description.trim();
        if description.is_empty() {
            Self::Unknown("Unknown API error".to_string())
        } else {
            Self::Unknown(description.to_string())
        }
    }

    pub fn kind(&self) -> DetailErrorKind {
        match self {
            Self::ConfigurationMissing => DetailErrorKind::ConfigurationMissing,
            Self::AuthFailure => DetailErrorKind::AuthFailure,
            Self::QuotaExceeded => DetailErrorKind::QuotaExceeded,
            Self::EmptyResponse => DetailErrorKind::EmptyResponse,
            Self::Unknown(_) => DetailErrorKind::Unknown,
        }
    }
}

/// A source of natural-language descriptions for coordinates
///
/// Implementations must be thread-safe; the session calls them from a
/// spawned task.
pub trait LocationDetailService: Send + Sync {
    /// Describe the location in roughly 4-5 sentences
    ///
    /// A blank successful answer must be reported as
    /// [`DetailError::EmptyResponse`], never as `Ok`.
    fn fetch_description(
        &self,
        coords: Coordinates,
    ) -> impl std::future::Future<Output = Result<String, DetailError>> + Send;
}

/// Build the prompt sent to the text model
pub fn location_prompt(coords: Coordinates) -> String {
    format!(
        "Tell me about the location at latitude {} and longitude {}. \
         Give a concise, engaging summary of 4 to 5 sentences covering its history \
         or its most interesting facts. If it is open ocean or an indistinct area, say so. \
         Focus on unique aspects or significant historical events where they apply. \
         Answer in plain text sentences.",
        coords.lat, coords.lng
    )
}
