//! Scripted detail service for tests
//!
//! Replies are consumed in order. A gated reply waits until its sender fires
//! (or is dropped), which lets tests resolve fetches out of order.

use crate::coord::Coordinates;
use crate::describe::{DetailError, LocationDetailService};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

struct Reply {
    outcome: Result<String, DetailError>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub struct ScriptedDescriber {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Coordinates>>,
    call_count: AtomicUsize,
}

impl ScriptedDescriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply
    pub fn reply(self, outcome: Result<String, DetailError>) -> Self {
        self.replies.lock().unwrap().push_back(Reply { outcome, gate: None });
        self
    }

    /// Queue a reply that is held back until the returned sender fires
    pub fn gated_reply(&self, outcome: Result<String, DetailError>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply {
            outcome,
            gate: Some(rx),
        });
        tx
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Coordinates> {
        self.calls.lock().unwrap().clone()
    }
}

impl LocationDetailService for ScriptedDescriber {
    async fn fetch_description(&self, coords: Coordinates) -> Result<String, DetailError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(coords);

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply { outcome, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                outcome
            }
            None => Err(DetailError::Unknown("no scripted reply left".to_string())),
        }
    }
}
