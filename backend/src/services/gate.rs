//! Single-outstanding-request gate.
//!
//! At most one AI analysis may be in flight per key (a session). A second
//! request for the same key is refused while the first holds its
//! [`AnalysisPermit`]; the permit frees the key when dropped, including on
//! error paths.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Default)]
pub struct AnalysisGate {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Proof that the holder owns the in-flight slot of one key.
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct AnalysisPermit {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl AnalysisGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot of `key`, or `None` if a request is already running.
    pub fn try_acquire(&self, key: &str) -> Option<AnalysisPermit> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(key.to_string()) {
            debug!("Analysis already in flight for {}", key);
            return None;
        }
        Some(AnalysisPermit {
            key: key.to_string(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Number of analyses currently running across all keys.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }
}

impl AnalysisPermit {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for AnalysisPermit {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.key);
    }
}
