//! Error types for geo-explorer

use crate::describe::DetailError;
use thiserror::Error;

/// Main error type for geo-explorer operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Map unavailable: {0}")]
    MapUnavailable(String),

    #[error(transparent)]
    Detail(#[from] DetailError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for geo-explorer operations
pub type Result<T> = std::result::Result<T, Error>;
