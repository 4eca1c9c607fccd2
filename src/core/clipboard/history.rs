use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::shared::types::{HistoryEntry, HistorySnapshot};
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::EngineSettings;

/// Storage trait for clipboard history persistence
///
/// Always the full log, newest first.
pub trait HistoryStorage: Send {
    fn load(&self) -> AppResult<Vec<HistoryEntry>>;
    fn save(&mut self, entries: &[HistoryEntry]) -> AppResult<()>;
}

/// Single pretty-printed JSON document on disk
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryStorage for JsonFileStorage {
    fn load(&self) -> AppResult<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| AppError::Io(format!("Failed to read history file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Storage(format!("Failed to parse history file: {}", e)))
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Io(format!("Failed to create data directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(entries)?;

        // Write beside the target and swap, so readers never see a partial document
        let temp = self.temp_path();
        std::fs::write(&temp, content)
            .map_err(|e| AppError::Io(format!("Failed to write history file: {}", e)))?;
        std::fs::rename(&temp, &self.path)
            .map_err(|e| AppError::Io(format!("Failed to replace history file: {}", e)))?;

        Ok(())
    }
}

#[derive(Default)]
struct InMemoryState {
    entries: Vec<HistoryEntry>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory storage, used when no data directory is available and in tests
///
/// Clones share the same backing state.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InMemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("[ClipboardHistory] Storage mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Last persisted log
    pub fn persisted(&self) -> Vec<HistoryEntry> {
        self.lock().entries.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

impl HistoryStorage for InMemoryStorage {
    fn load(&self) -> AppResult<Vec<HistoryEntry>> {
        Ok(self.lock().entries.clone())
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> AppResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(AppError::Io("Disk full".to_string()));
        }
        state.entries = entries.to_vec();
        state.writes += 1;
        Ok(())
    }
}

/// JSON file at the configured location, in-memory when there is no data directory
pub fn storage_for(settings: &EngineSettings) -> Box<dyn HistoryStorage> {
    match settings.history_path() {
        Some(path) => {
            log::info!("[ClipboardHistory] Persisting to {}", path.display());
            Box::new(JsonFileStorage::new(path))
        }
        None => {
            log::warn!("[ClipboardHistory] No data directory available, using in-memory fallback");
            Box::new(InMemoryStorage::new())
        }
    }
}

/// Capacity-bounded clipboard history, newest first
///
/// The in-memory log is authoritative. Every mutation is flushed to storage and
/// then published as a fresh snapshot; a failed flush is logged and reconciled
/// by the next successful one.
pub struct ClipboardHistory {
    entries: Vec<HistoryEntry>,
    capacity: usize,
    storage: Box<dyn HistoryStorage>,
    snapshots: watch::Sender<HistorySnapshot>,
}

impl ClipboardHistory {
    /// Load the persisted log. Unreadable storage starts an empty history.
    pub fn load(storage: Box<dyn HistoryStorage>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = storage.load().unwrap_or_else(|e| {
            log::warn!("[ClipboardHistory] Failed to load history, starting empty: {}", e);
            Vec::new()
        });
        if entries.len() > capacity {
            log::info!(
                "[ClipboardHistory] Trimming {} loaded entries to capacity {}",
                entries.len(),
                capacity
            );
            entries.truncate(capacity);
        }

        let (snapshots, _) = watch::channel(Arc::new(entries.clone()));
        log::info!("[ClipboardHistory] Loaded {} entries", entries.len());

        Self {
            entries,
            capacity,
            storage,
            snapshots,
        }
    }

    /// Receive a snapshot after every mutation
    pub fn subscribe(&self) -> watch::Receiver<HistorySnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn head(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend an entry, evicting from the tail past capacity. Returns evicted entries.
    pub fn insert(&mut self, entry: HistoryEntry) -> Vec<HistoryEntry> {
        log::debug!("[ClipboardHistory] Added {:?} entry {}", entry.kind, entry.id);
        self.entries.insert(0, entry);

        let evicted = if self.entries.len() > self.capacity {
            self.entries.split_off(self.capacity)
        } else {
            Vec::new()
        };
        for old in &evicted {
            log::debug!("[ClipboardHistory] Evicted {}", old.id);
        }

        self.commit();
        evicted
    }

    /// Delete by id. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        let removed = self.entries.remove(index);
        log::debug!("[ClipboardHistory] Removed {}", id);
        self.commit();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        log::info!("[ClipboardHistory] Cleared all items");
        self.commit();
    }

    /// Write the full log to storage
    pub fn flush(&mut self) -> AppResult<()> {
        self.storage.save(&self.entries)
    }

    fn commit(&mut self) {
        if let Err(e) = self.flush() {
            log::warn!("[ClipboardHistory] Failed to persist history: {}", e);
        }
        self.snapshots.send_replace(Arc::new(self.entries.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::EntryKind;

    fn text(content: &str) -> HistoryEntry {
        HistoryEntry::new(EntryKind::Text, content.to_string())
    }

    fn contents(history: &ClipboardHistory) -> Vec<String> {
        history.entries().iter().map(|e| e.content.clone()).collect()
    }

    #[test]
    fn test_add_and_get_items() {
        let mut history = ClipboardHistory::load(Box::new(InMemoryStorage::new()), 100);

        history.insert(text("First item"));
        history.insert(text("Second item"));

        assert_eq!(contents(&history), vec!["Second item", "First item"]); // Most recent first
        assert_eq!(history.head().map(|e| e.content.as_str()), Some("Second item"));
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut history = ClipboardHistory::load(Box::new(InMemoryStorage::new()), 100);
        let first = text("Item 0");
        let first_id = first.id.clone();
        history.insert(first);

        for i in 1..=100 {
            history.insert(text(&format!("Item {}", i)));
            assert!(history.len() <= 100);
        }

        assert_eq!(history.len(), 100);
        assert!(history.get(&first_id).is_none());
        assert_eq!(history.head().unwrap().content, "Item 100");
    }

    #[test]
    fn test_eviction_keeps_newest_first() {
        let mut history = ClipboardHistory::load(Box::new(InMemoryStorage::new()), 3);

        let mut evicted = Vec::new();
        for letter in 'A'..='Z' {
            evicted.extend(history.insert(text(&letter.to_string())));
        }

        assert_eq!(contents(&history), vec!["Z", "Y", "X"]);
        assert_eq!(evicted.len(), 23);
        assert_eq!(evicted[0].content, "A");
    }

    #[test]
    fn test_remove() {
        let mut history = ClipboardHistory::load(Box::new(InMemoryStorage::new()), 10);
        history.insert(text("keep"));
        let doomed = text("drop");
        let id = doomed.id.clone();
        history.insert(doomed);

        assert_eq!(history.remove(&id).map(|e| e.content), Some("drop".to_string()));
        assert_eq!(contents(&history), vec!["keep"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let storage = InMemoryStorage::new();
        let mut history = ClipboardHistory::load(Box::new(storage.clone()), 10);
        history.insert(text("keep"));
        let writes = storage.write_count();

        assert!(history.remove("missing").is_none());
        assert_eq!(history.len(), 1);
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut history = ClipboardHistory::load(Box::new(InMemoryStorage::new()), 10);
        history.insert(text("Item 1"));
        history.insert(text("Item 2"));

        history.clear();
        assert!(history.is_empty());
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = InMemoryStorage::new();
        let mut history = ClipboardHistory::load(Box::new(storage.clone()), 10);

        history.insert(text("one"));
        assert_eq!(storage.persisted(), history.entries());
        history.insert(text("two"));
        let id = history.head().unwrap().id.clone();
        history.remove(&id);
        assert_eq!(storage.persisted(), history.entries());
        history.clear();
        assert!(storage.persisted().is_empty());
        assert_eq!(storage.write_count(), 4);
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let storage = InMemoryStorage::new();
        let mut history = ClipboardHistory::load(Box::new(storage.clone()), 10);

        storage.fail_writes(true);
        history.insert(text("unsaved"));
        assert_eq!(history.len(), 1);
        assert!(storage.persisted().is_empty());

        // Next successful write reconciles
        storage.fail_writes(false);
        history.insert(text("saved"));
        assert_eq!(storage.persisted(), history.entries());
        assert_eq!(storage.persisted().len(), 2);
    }

    #[test]
    fn test_snapshot_broadcast() {
        let mut history = ClipboardHistory::load(Box::new(InMemoryStorage::new()), 10);
        let mut rx = history.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        history.insert(text("hello"));
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.len(), 1);

        // Snapshots are point-in-time copies
        history.clear();
        assert_eq!(snapshot.len(), 1);
        assert!(history.snapshot().is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clipboard_history.json");

        let mut history = ClipboardHistory::load(Box::new(JsonFileStorage::new(&path)), 10);
        history.insert(text("plain"));
        history.insert(HistoryEntry::new(EntryKind::Link, "https://example.com".into()));
        history.insert(HistoryEntry::new(EntryKind::Code, "const x = 1;".into()));

        let reloaded = ClipboardHistory::load(Box::new(JsonFileStorage::new(&path)), 10);
        assert_eq!(reloaded.entries(), history.entries());
        assert!(!path.with_file_name("clipboard_history.json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("absent.json"));

        assert!(storage.load().unwrap().is_empty());
        assert!(ClipboardHistory::load(Box::new(storage), 10).is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipboard_history.json");
        std::fs::write(&path, "[{ broken").unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.load(), Err(AppError::Storage(_))));
        assert!(ClipboardHistory::load(Box::new(storage), 10).is_empty());
    }

    #[test]
    fn test_load_trims_to_capacity() {
        let mut storage = InMemoryStorage::new();
        let entries: Vec<_> = (0..5).map(|i| text(&format!("Item {}", i))).collect();
        storage.save(&entries).unwrap();

        let history = ClipboardHistory::load(Box::new(storage), 2);
        assert_eq!(contents(&history), vec!["Item 0", "Item 1"]);
    }
}
