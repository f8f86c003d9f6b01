//! Held file lookup backed by an in-memory map

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::decision_engine::{HeldFile, HeldStateLookup};

#[derive(Debug, Default)]
pub struct HeldFileStore {
    files: RwLock<HashMap<Uuid, HeldFile>>,
}

impl HeldFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, media_id: Uuid, file: HeldFile) {
        self.files.write().insert(media_id, file);
    }

    pub fn remove(&self, media_id: Uuid) -> Option<HeldFile> {
        self.files.write().remove(&media_id)
    }
}

impl HeldStateLookup for HeldFileStore {
    fn held_file(&self, media_id: Uuid) -> Result<Option<HeldFile>> {
        Ok(self.files.read().get(&media_id).cloned())
    }
}
