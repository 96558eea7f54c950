use super::{Checkpoint, SessionListing, SessionStore, StoreError, sort_listings};
use crate::transcript::{SessionId, Transcript};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local checkpointer. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    checkpoints: RwLock<HashMap<SessionId, Checkpoint>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load_checkpoint(&self, id: &SessionId) -> Result<Checkpoint, StoreError> {
        self.checkpoints
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn save(&self, id: &SessionId, transcript: &Transcript) -> Result<Checkpoint, StoreError> {
        let checkpoint = Checkpoint::new(id.clone(), transcript.clone());
        self.checkpoints
            .write()
            .insert(id.clone(), checkpoint.clone());
        Ok(checkpoint)
    }

    fn list(&self) -> Result<Vec<SessionListing>, StoreError> {
        let mut listings: Vec<SessionListing> = self
            .checkpoints
            .read()
            .values()
            .map(SessionListing::from)
            .collect();
        sort_listings(&mut listings);
        Ok(listings)
    }
}
