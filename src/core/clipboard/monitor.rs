use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::EngineSettings;
use crate::shared::types::{preview_text, EntryKind, HistoryEntry, HistorySnapshot};
use crate::system::clipboard::ClipboardBackend;
use super::classifier;
use super::detector::{self, CaptureCursor, Candidate};
use super::guard::{self, Verdict};
use super::history::{self, ClipboardHistory};
use super::image;

/// Where a tick stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Monitoring disabled, nothing was read
    Paused,
    /// Clipboard empty or unchanged
    Idle,
    /// Clipboard access or image encoding failed; retried next tick
    Failed,
    /// Echo of our own write
    Suppressed,
    /// Same as the newest entry
    Duplicate,
    Captured(HistoryEntry),
}

/// Single-timeline capture state: clipboard, cursor and history together
///
/// Ticks and user commands both take `&mut self`, so they can never interleave.
pub struct CaptureEngine {
    clipboard: Box<dyn ClipboardBackend>,
    cursor: CaptureCursor,
    history: ClipboardHistory,
}

impl CaptureEngine {
    pub fn new(clipboard: Box<dyn ClipboardBackend>, history: ClipboardHistory) -> Self {
        Self {
            clipboard,
            cursor: CaptureCursor::new(),
            history,
        }
    }

    pub fn history(&self) -> &ClipboardHistory {
        &self.history
    }

    pub fn cursor(&self) -> &CaptureCursor {
        &self.cursor
    }

    /// Run one capture cycle. Failures are logged and reported, never raised.
    pub fn tick(&mut self) -> TickOutcome {
        match self.try_tick() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("[ClipboardMonitor] Tick failed: {}", e);
                TickOutcome::Failed
            }
        }
    }

    fn try_tick(&mut self) -> AppResult<TickOutcome> {
        let Some(candidate) = detector::detect(&mut self.cursor, self.clipboard.as_mut())? else {
            log::trace!("[ClipboardMonitor] Idle tick");
            return Ok(TickOutcome::Idle);
        };

        let (kind, content) = match &candidate {
            Candidate::Text(text) => (classifier::classify(text), text.clone()),
            Candidate::Image { image, .. } => (EntryKind::Image, image::encode_data_uri(image)?),
        };

        match guard::admit(&mut self.cursor, &candidate, kind, &content, self.history.head()) {
            Verdict::Suppressed => {
                log::debug!("[ClipboardMonitor] Ignored echo of our own clipboard write");
                return Ok(TickOutcome::Suppressed);
            }
            Verdict::Duplicate => {
                log::debug!("[ClipboardMonitor] Skipping duplicate of newest entry");
                return Ok(TickOutcome::Duplicate);
            }
            Verdict::Admit => {}
        }

        let entry = HistoryEntry::new(kind, content);
        log::debug!(
            "[ClipboardMonitor] Captured {:?}: \"{}\"",
            entry.kind,
            preview_text(&entry.preview(), 20)
        );
        self.history.insert(entry.clone());

        Ok(TickOutcome::Captured(entry))
    }

    /// Put a history entry back on the clipboard without re-capturing it
    pub fn copy_entry(&mut self, id: &str) -> AppResult<()> {
        let entry = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Clipboard entry {}", id)))?;

        match entry.kind {
            EntryKind::Image => self.copy_image_uri(&entry.content),
            _ => self.copy_text(&entry.content),
        }
    }

    /// Write arbitrary text (e.g. a transform result) without capturing it
    pub fn copy_text(&mut self, text: &str) -> AppResult<()> {
        let armed = self.cursor.arm_text(text);

        if let Err(e) = self.clipboard.write_text(text) {
            if armed {
                self.cursor.disarm_text();
            }
            log::warn!("[ClipboardMonitor] Failed to write text to clipboard: {}", e);
            return Err(e);
        }

        log::debug!("[ClipboardMonitor] Copied text to clipboard (suppressed: {})", armed);
        Ok(())
    }

    fn copy_image_uri(&mut self, uri: &str) -> AppResult<()> {
        let image = image::decode_data_uri(uri)?;
        let armed = self.cursor.arm_image(&image::digest(&image));

        if let Err(e) = self.clipboard.write_image(&image) {
            if armed {
                self.cursor.disarm_image();
            }
            log::warn!("[ClipboardMonitor] Failed to write image to clipboard: {}", e);
            return Err(e);
        }

        log::debug!("[ClipboardMonitor] Copied image to clipboard (suppressed: {})", armed);
        Ok(())
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        self.history.remove(id).is_some()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

/// Clipboard monitor that polls for changes
///
/// Cheap to clone; every clone drives the same engine.
#[derive(Clone)]
pub struct ClipboardMonitor {
    enabled: Arc<AtomicBool>,
    engine: Arc<Mutex<CaptureEngine>>,
    interval: Duration,
}

impl ClipboardMonitor {
    pub fn new(engine: CaptureEngine, interval: Duration) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
            engine: Arc::new(Mutex::new(engine)),
            interval,
        }
    }

    /// Build the engine from settings: persisted history plus the given clipboard
    pub fn from_settings(settings: &EngineSettings, clipboard: Box<dyn ClipboardBackend>) -> Self {
        let history = ClipboardHistory::load(history::storage_for(settings), settings.history_capacity());
        let monitor = Self::new(CaptureEngine::new(clipboard, history), settings.poll_interval());
        if !settings.capture.start_enabled {
            monitor.disable();
        }
        monitor
    }

    fn lock_engine(&self) -> MutexGuard<'_, CaptureEngine> {
        match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("[ClipboardMonitor] Mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Poll forever on the configured interval. Spawn it; abort the task to stop.
    pub async fn run(self) {
        log::info!("[ClipboardMonitor] Started monitoring every {:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick();
        }
    }

    pub fn tick(&self) -> TickOutcome {
        if !self.is_enabled() {
            return TickOutcome::Paused;
        }
        self.lock_engine().tick()
    }

    pub fn copy_entry(&self, id: &str) -> AppResult<()> {
        self.lock_engine().copy_entry(id)
    }

    pub fn copy_text(&self, text: &str) -> AppResult<()> {
        self.lock_engine().copy_text(text)
    }

    pub fn delete_entry(&self, id: &str) -> bool {
        self.lock_engine().delete_entry(id)
    }

    pub fn clear_history(&self) {
        self.lock_engine().clear_history();
    }

    pub fn history(&self) -> HistorySnapshot {
        self.lock_engine().history().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<HistorySnapshot> {
        self.lock_engine().history().subscribe()
    }

    /// Enable clipboard monitoring
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        log::info!("[ClipboardMonitor] Enabled");
    }

    /// Disable clipboard monitoring
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        log::info!("[ClipboardMonitor] Disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Toggle monitoring on/off, returning the new state
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::SeqCst);
        log::info!("[ClipboardMonitor] Toggled to {}", enabled);
        enabled
    }
}
