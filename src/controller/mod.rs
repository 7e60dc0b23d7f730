//! Selection/fetch controller
//!
//! Holds the one piece of real state in the application: which point is
//! selected and what happened when its description was requested.
//!
//! ```text
//! Idle --select--> Selected --begin_request--> Fetching --complete--> Resolved
//!   ^                 ^  |                        |                      |
//!   |                 +--+------- select ---------+----------------------+
//! ```
//!
//! Every selection bumps a generation counter. A fetch carries the generation
//! it was started for in its [`FetchTicket`]; when it completes after the user
//! has moved on, [`Controller::complete`] drops the result instead of
//! attributing it to the newer selection.
//!
//! At most one fetch runs at a time. A new selection does not cancel the
//! fetch already in flight, so the action stays disabled until it completes.
//!
//! Only one attempt is made per selection, successful or not. Requesting
//! details again requires a new selection.

pub mod session;

use crate::coord::Coordinates;
use crate::describe::DetailError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use session::{Session, SessionSnapshot};

/// Action label while a fetch is pending
pub const LABEL_LOADING: &str = "LOADING...";
/// Action label once a point is selected
pub const LABEL_SELECTION: &str = "GET INFO FOR SELECTION";
/// Action label before anything is selected
pub const LABEL_PLACEHOLDER: &str = "GET INFO FOR ...";

/// Outcome of the most recent fetch for the current selection
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Absent,
    Pending,
    Success(String),
    Failure(DetailError),
}

/// Coarse controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Selected,
    Fetching,
    Resolved,
}

/// Proof that a fetch was started for a particular selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    coords: Coordinates,
}

impl FetchTicket {
    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What `complete` did with a fetch outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The selection changed while the fetch was in flight
    Discarded,
}

#[derive(Debug, Clone)]
pub struct Controller {
    selection: Option<Coordinates>,
    generation: u64,
    result: FetchResult,
    attempted: bool,
    resolved_at: Option<DateTime<Utc>>,
    map_configured: bool,
    /// Generation of the fetch currently running, whichever selection it was for
    in_flight: Option<u64>,
}

impl Controller {
    /// `map_configured` is the startup check of the map credential; the
    /// action stays disabled for the whole session without it.
    pub fn new(map_configured: bool) -> Self {
        Self {
            selection: None,
            generation: 0,
            result: FetchResult::Absent,
            attempted: false,
            resolved_at: None,
            map_configured,
            in_flight: None,
        }
    }

    /// Replace the selection; clears text, error and the attempt flag
    ///
    /// A fetch already in flight keeps running and still blocks new requests.
    pub fn select(&mut self, coords: Coordinates) {
        self.selection = Some(coords);
        self.generation = self.generation.wrapping_add(1);
        self.result = FetchResult::Absent;
        self.attempted = false;
        self.resolved_at = None;
    }

    /// Whether a details request would be accepted right now
    pub fn can_request(&self) -> bool {
        self.selection.is_some()
            && !self.is_pending()
            && self.map_configured
            && !self.attempted
    }

    /// Whether the action control gets its "active" styling
    pub fn is_active(&self) -> bool {
        self.can_request()
    }

    /// Start a fetch for the current selection
    ///
    /// Returns `None` and changes nothing when [`can_request`](Self::can_request)
    /// is false.
    pub fn begin_request(&mut self) -> Option<FetchTicket> {
        if !self.can_request() {
            return None;
        }
        let coords = self.selection?;
        self.result = FetchResult::Pending;
        self.in_flight = Some(self.generation);
        Some(FetchTicket {
            generation: self.generation,
            coords,
        })
    }

    /// Record the outcome of a fetch started with `ticket`
    ///
    /// Ends the in-flight fetch either way. The outcome is only applied when
    /// the selection has not changed since the ticket was issued.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<String, DetailError>,
    ) -> Resolution {
        if self.in_flight != Some(ticket.generation) {
            return Resolution::Discarded;
        }
        self.in_flight = None;

        if ticket.generation != self.generation || self.result != FetchResult::Pending {
            return Resolution::Discarded;
        }

        self.result = match outcome {
            Ok(text) if text.trim().is_empty() => FetchResult::Failure(DetailError::EmptyResponse),
            Ok(text) => FetchResult::Success(text),
            Err(e) => FetchResult::Failure(e),
        };
        self.attempted = true;
        self.resolved_at = Some(Utc::now());
        Resolution::Applied
    }

    pub fn phase(&self) -> Phase {
        match (&self.selection, &self.result) {
            (None, _) => Phase::Idle,
            (Some(_), FetchResult::Absent) => Phase::Selected,
            (Some(_), FetchResult::Pending) => Phase::Fetching,
            (Some(_), FetchResult::Success(_) | FetchResult::Failure(_)) => Phase::Resolved,
        }
    }

    pub fn action_label(&self) -> &'static str {
        if self.is_pending() {
            LABEL_LOADING
        } else if self.selection.is_some() {
            LABEL_SELECTION
        } else {
            LABEL_PLACEHOLDER
        }
    }

    pub fn selection(&self) -> Option<Coordinates> {
        self.selection
    }

    pub fn result(&self) -> &FetchResult {
        &self.result
    }

    /// Whether a fetch is running, for this selection or a previous one
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn map_configured(&self) -> bool {
        self.map_configured
    }

    pub fn text(&self) -> Option<&str> {
        match &self.result {
            FetchResult::Success(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DetailError> {
        match &self.result {
            FetchResult::Failure(e) => Some(e),
            _ => None,
        }
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }
}
