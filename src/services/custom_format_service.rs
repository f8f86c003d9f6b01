//! Custom format definitions service.
//!
//! Wraps a [CustomFormatRepository] with a read-through snapshot cache. Every
//! mutation clears the cache and publishes a [CustomFormatEvent]; readers that
//! already hold a snapshot keep seeing it unchanged.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::custom_formats::CustomFormat;
use crate::decision_engine::{FormatMatcher, ReleaseInfo};

/// Storage for custom format definitions
pub trait CustomFormatRepository: Send + Sync {
    fn all(&self) -> Result<Vec<CustomFormat>>;
    fn get(&self, id: i32) -> Result<Option<CustomFormat>>;
    fn insert(&self, format: CustomFormat) -> Result<CustomFormat>;
    fn update(&self, format: CustomFormat) -> Result<()>;
    fn delete(&self, id: i32) -> Result<()>;
}

/// In-memory repository. Ids are assigned on insert.
#[derive(Debug, Default)]
pub struct InMemoryCustomFormatRepository {
    formats: RwLock<BTreeMap<i32, CustomFormat>>,
}

impl InMemoryCustomFormatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with formats that already carry ids.
    pub fn with_formats(formats: impl IntoIterator<Item = CustomFormat>) -> Self {
        let map = formats.into_iter().map(|f| (f.id, f)).collect();
        Self {
            formats: RwLock::new(map),
        }
    }
}

impl CustomFormatRepository for InMemoryCustomFormatRepository {
    fn all(&self) -> Result<Vec<CustomFormat>> {
        Ok(self.formats.read().values().cloned().collect())
    }

    fn get(&self, id: i32) -> Result<Option<CustomFormat>> {
        Ok(self.formats.read().get(&id).cloned())
    }

    fn insert(&self, mut format: CustomFormat) -> Result<CustomFormat> {
        let mut formats = self.formats.write();
        format.id = formats
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| anyhow!("custom format ids exhausted"))?;
        formats.insert(format.id, format.clone());
        Ok(format)
    }

    fn update(&self, format: CustomFormat) -> Result<()> {
        let mut formats = self.formats.write();
        match formats.get_mut(&format.id) {
            Some(existing) => {
                *existing = format;
                Ok(())
            }
            None => Err(anyhow!("custom format {} not found", format.id)),
        }
    }

    fn delete(&self, id: i32) -> Result<()> {
        self.formats
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("custom format {} not found", id))
    }
}

/// Published after every successful mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomFormatEvent {
    Added(CustomFormat),
    Updated(CustomFormat),
    Deleted(CustomFormat),
}

type Snapshot = Arc<BTreeMap<i32, CustomFormat>>;

pub struct CustomFormatService {
    repository: Arc<dyn CustomFormatRepository>,
    cache: RwLock<Option<Snapshot>>,
    events: broadcast::Sender<CustomFormatEvent>,
}

impl CustomFormatService {
    pub fn new(repository: Arc<dyn CustomFormatRepository>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            repository,
            cache: RwLock::new(None),
            events,
        }
    }

    /// Load definitions from a JSON array file into an in-memory repository.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read custom formats from {}", path.display()))?;
        let formats: Vec<CustomFormat> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid custom formats in {}", path.display()))?;

        info!(count = formats.len(), path = %path.display(), "Loaded custom formats");
        Ok(Self::new(Arc::new(
            InMemoryCustomFormatRepository::with_formats(formats),
        )))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CustomFormatEvent> {
        self.events.subscribe()
    }

    /// Current snapshot, filled from the repository on first use after a clear.
    pub fn snapshot(&self) -> Result<Snapshot> {
        if let Some(snapshot) = self.cache.read().as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let mut cache = self.cache.write();
        if let Some(snapshot) = cache.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let all: BTreeMap<i32, CustomFormat> = self
            .repository
            .all()?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();
        debug!(count = all.len(), "Custom format cache filled");

        let snapshot = Arc::new(all);
        *cache = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn all(&self) -> Result<Vec<CustomFormat>> {
        Ok(self.snapshot()?.values().cloned().collect())
    }

    pub fn get_by_id(&self, id: i32) -> Result<CustomFormat> {
        self.snapshot()?
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("custom format {} not found", id))
    }

    pub fn insert(&self, format: CustomFormat) -> Result<CustomFormat> {
        let inserted = self.repository.insert(format)?;
        self.clear_cache();
        self.publish(CustomFormatEvent::Added(inserted.clone()));
        Ok(inserted)
    }

    pub fn update(&self, format: CustomFormat) -> Result<()> {
        self.repository.update(format.clone())?;
        self.clear_cache();
        self.publish(CustomFormatEvent::Updated(format));
        Ok(())
    }

    pub fn delete(&self, id: i32) -> Result<()> {
        let format = self
            .repository
            .get(id)?
            .ok_or_else(|| anyhow!("custom format {} not found", id))?;

        self.repository.delete(id)?;
        self.clear_cache();
        self.publish(CustomFormatEvent::Deleted(format));
        Ok(())
    }

    fn clear_cache(&self) {
        *self.cache.write() = None;
    }

    fn publish(&self, event: CustomFormatEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Resolves the format ids an upstream matcher attached to the release.
impl FormatMatcher for CustomFormatService {
    fn matched_formats(&self, release: &ReleaseInfo) -> Result<Vec<CustomFormat>> {
        let snapshot = self.snapshot()?;
        release
            .matched_format_ids
            .iter()
            .map(|id| {
                snapshot.get(id).cloned().ok_or_else(|| {
                    anyhow!("release '{}' references unknown custom format {}", release.title, id)
                })
            })
            .collect()
    }
}
