//! Records kept by the session store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::api::{SessionId, SessionPayload};

/// A stored hand-off payload with its bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: SessionId,
    /// Checksum of the records in `payload`.
    pub checksum: String,
    pub payload: SessionPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(id: SessionId, checksum: impl Into<String>, payload: SessionPayload) -> Self {
        let now = Utc::now();
        Self {
            id,
            checksum: checksum.into(),
            payload,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn record_count(&self) -> usize {
        self.payload.raw_data.len()
    }
}
