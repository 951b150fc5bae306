//! Periodic saving of the open document.

use crate::document::Document;
use crate::storage::{FileStorage, Storage, StorageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 10;

/// Record holding the most recent auto-save, used for crash recovery.
pub const AUTOSAVE_KEY: &str = "designdraw-autosave";

/// Id used when saving a document that was never given one.
pub const DEFAULT_DOCUMENT_ID: &str = "untitled";

/// Tracks unsaved changes and writes them out at most once per interval.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
    current_doc_id: Option<String>,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            current_doc_id: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the document as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_document_id(&mut self, id: Option<String>) {
        self.current_doc_id = id;
    }

    pub fn document_id(&self) -> Option<&str> {
        self.current_doc_id.as_deref()
    }

    /// Dirty and the interval has elapsed since the last save.
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save if [`AutoSaveManager::should_save`] and the document has
    /// content. Returns true if a save was performed.
    pub async fn maybe_save(&mut self, document: &Document) -> StorageResult<bool> {
        if !self.should_save() || document.objects.is_empty() {
            return Ok(false);
        }
        self.save(document).await?;
        Ok(true)
    }

    /// Save immediately, under the current id and as the auto-save record.
    pub async fn save(&mut self, document: &Document) -> StorageResult<()> {
        let doc_id = self
            .current_doc_id
            .clone()
            .unwrap_or_else(|| DEFAULT_DOCUMENT_ID.to_string());

        self.storage.save(&doc_id, document).await?;
        self.storage.save(AUTOSAVE_KEY, document).await?;
        log::info!("auto-saved {} objects as {doc_id}", document.objects.len());

        self.last_save = Some(Instant::now());
        self.dirty = false;
        Ok(())
    }

    /// Load a document by ID and make it current.
    pub async fn load(&mut self, id: &str) -> StorageResult<Document> {
        let doc = self.storage.load(id).await?;
        self.current_doc_id = Some(id.to_string());
        self.dirty = false;
        self.last_save = Some(Instant::now());
        Ok(doc)
    }

    /// The most recent auto-save, if any.
    pub async fn load_last(&mut self) -> Option<Document> {
        match self.storage.load(AUTOSAVE_KEY).await {
            Ok(doc) => {
                self.dirty = false;
                self.last_save = Some(Instant::now());
                Some(doc)
            }
            Err(e) => {
                log::debug!("no auto-save to recover: {e}");
                None
            }
        }
    }

    pub async fn delete(&self, id: &str) -> StorageResult<()> {
        self.storage.delete(id).await
    }

    /// Saved document IDs, excluding the auto-save record.
    pub async fn list_documents(&self) -> StorageResult<Vec<String>> {
        let mut docs = self.storage.list().await?;
        docs.retain(|id| id != AUTOSAVE_KEY);
        Ok(docs)
    }

    pub async fn exists(&self, id: &str) -> StorageResult<bool> {
        self.storage.exists(id).await
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// File storage in the platform data directory.
pub fn create_default_storage() -> StorageResult<Arc<FileStorage>> {
    Ok(Arc::new(FileStorage::default_location()?))
}

/// Auto-save manager over [`create_default_storage`], with the given
/// interval in seconds.
pub fn create_autosave_manager(interval_secs: u64) -> StorageResult<AutoSaveManager<FileStorage>> {
    let storage = create_default_storage()?;
    Ok(AutoSaveManager::new(storage).with_interval(Duration::from_secs(interval_secs)))
}
