//! geo-explorer: click a point on a map, read about the place
//!
//! A library and CLI tool that pairs a map widget with an AI-generated
//! description of whatever location the user clicked.
//!
//! ## Features
//!
//! - Single-marker map selection with readiness gating
//! - Selection/fetch controller with stale-result protection
//! - Gemini `generateContent` backend with failure classification
//! - HTTP API + browser page, plus a one-shot CLI
//!
//! ## Quick Start
//!
//! ```rust
//! use geo_explorer::controller::{Controller, Phase};
//! use geo_explorer::coord::Coordinates;
//!
//! let mut controller = Controller::new(true);
//! controller.select(Coordinates::new(48.8566, 2.3522));
//! assert_eq!(controller.phase(), Phase::Selected);
//!
//! let ticket = controller.begin_request().unwrap();
//! controller.complete(ticket, Ok("Paris is the capital of France.".to_string()));
//! assert_eq!(controller.phase(), Phase::Resolved);
//! assert!(!controller.can_request());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod coord;
pub mod describe;
pub mod error;
pub mod map;
pub mod server;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use controller::{Controller, Phase, Session};
pub use coord::Coordinates;
pub use describe::{DetailError, LocationDetailService};
pub use error::{Error, Result};
