//! Checkpoint persistence for chat sessions
//!
//! A [`SessionStore`] maps a [`SessionId`] to the latest transcript of that
//! session. The chat loop saves after every completed turn, so a restarted
//! process picks up where it left off.

mod file;
mod memory;

pub use file::{FileSessionStore, resolve_sessions_dir};
pub use memory::MemorySessionStore;

use crate::transcript::{SessionId, Transcript};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no checkpoint found for session '{0}'")]
    NotFound(SessionId),
    #[error("corrupt checkpoint {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("checkpoint I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize checkpoint: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted state of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub session_id: SessionId,
    pub updated_at: DateTime<Utc>,
    pub transcript: Transcript,
}

impl Checkpoint {
    pub fn new(session_id: SessionId, transcript: Transcript) -> Self {
        Self {
            session_id,
            updated_at: Utc::now(),
            transcript,
        }
    }
}

/// Short description of a stored session, newest first in listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionListing {
    pub session_id: SessionId,
    pub turns: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&Checkpoint> for SessionListing {
    fn from(checkpoint: &Checkpoint) -> Self {
        Self {
            session_id: checkpoint.session_id.clone(),
            turns: checkpoint.transcript.len(),
            updated_at: checkpoint.updated_at,
        }
    }
}

pub trait SessionStore: Send + Sync {
    /// Load the checkpoint for `id`, or [`StoreError::NotFound`].
    fn load_checkpoint(&self, id: &SessionId) -> Result<Checkpoint, StoreError>;

    /// Replace the checkpoint for `id` with `transcript`.
    fn save(&self, id: &SessionId, transcript: &Transcript) -> Result<Checkpoint, StoreError>;

    /// All stored sessions, most recently updated first.
    fn list(&self) -> Result<Vec<SessionListing>, StoreError>;

    fn load(&self, id: &SessionId) -> Result<Transcript, StoreError> {
        self.load_checkpoint(id)
            .map(|checkpoint| checkpoint.transcript)
    }

    /// Like [`SessionStore::load`], but an unknown session starts empty.
    fn load_or_default(&self, id: &SessionId) -> Result<Transcript, StoreError> {
        match self.load(id) {
            Ok(transcript) => Ok(transcript),
            Err(StoreError::NotFound(_)) => Ok(Transcript::new()),
            Err(err) => Err(err),
        }
    }
}

fn sort_listings(listings: &mut [SessionListing]) {
    listings.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.session_id.cmp(&b.session_id))
    });
}
