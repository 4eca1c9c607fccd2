//! Platform clipboard access
//!
//! The capture engine only sees the [`ClipboardBackend`] trait. `SystemClipboard`
//! talks to the OS through `arboard`; `MemoryClipboard` is an in-process stand-in
//! for tests and headless embedding.

use std::sync::{Arc, Mutex, MutexGuard};
use std::borrow::Cow;

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::ClipboardImage;

/// Read/write capability over the two clipboard channels
///
/// `Ok(None)` means the channel is empty; `Err` is a genuine access failure.
pub trait ClipboardBackend: Send {
    fn read_text(&mut self) -> AppResult<Option<String>>;
    fn read_image(&mut self) -> AppResult<Option<ClipboardImage>>;
    fn write_text(&mut self, text: &str) -> AppResult<()>;
    fn write_image(&mut self, image: &ClipboardImage) -> AppResult<()>;
}

/// OS clipboard via `arboard`
///
/// The handle is opened lazily and dropped after a failure so the next tick
/// reconnects.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self { inner: None }
    }

    fn handle(&mut self) -> AppResult<&mut arboard::Clipboard> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| AppError::Clipboard("Clipboard handle unavailable".to_string()))
    }

    fn reset(&mut self, err: arboard::Error) -> AppError {
        self.inner = None;
        err.into()
    }
}

impl ClipboardBackend for SystemClipboard {
    fn read_text(&mut self) -> AppResult<Option<String>> {
        let result = self.handle()?.get_text();
        match result {
            Ok(text) if text.is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(self.reset(e)),
        }
    }

    fn read_image(&mut self) -> AppResult<Option<ClipboardImage>> {
        let result = self.handle()?.get_image();
        match result {
            Ok(data) => {
                let image = ClipboardImage::new(
                    data.width as u32,
                    data.height as u32,
                    data.bytes.into_owned(),
                );
                Ok((!image.is_empty()).then_some(image))
            }
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(self.reset(e)),
        }
    }

    fn write_text(&mut self, text: &str) -> AppResult<()> {
        let result = self.handle()?.set_text(text);
        result.map_err(|e| self.reset(e))
    }

    fn write_image(&mut self, image: &ClipboardImage) -> AppResult<()> {
        let data = arboard::ImageData {
            width: image.width as usize,
            height: image.height as usize,
            bytes: Cow::Borrowed(image.rgba.as_slice()),
        };
        let result = self.handle()?.set_image(data);
        result.map_err(|e| self.reset(e))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    text: Option<String>,
    image: Option<ClipboardImage>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// Shared in-memory clipboard
///
/// Clones share one state, so a test can keep a handle while the engine owns
/// another. Setting one channel clears the other, as an OS copy would.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("[MemoryClipboard] Mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Simulate an external text copy
    pub fn set_text(&self, text: impl Into<String>) {
        let mut state = self.lock();
        state.text = Some(text.into());
        state.image = None;
    }

    /// Simulate an external image copy
    pub fn set_image(&self, image: ClipboardImage) {
        let mut state = self.lock();
        state.image = Some(image);
        state.text = None;
    }

    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    pub fn image(&self) -> Option<ClipboardImage> {
        self.lock().image.clone()
    }

    /// Number of successful programmatic writes
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn read_text(&mut self) -> AppResult<Option<String>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(AppError::Clipboard("Clipboard is locked by another process".to_string()));
        }
        Ok(state.text.clone().filter(|t| !t.is_empty()))
    }

    fn read_image(&mut self) -> AppResult<Option<ClipboardImage>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(AppError::Clipboard("Clipboard is locked by another process".to_string()));
        }
        Ok(state.image.clone().filter(|i| !i.is_empty()))
    }

    fn write_text(&mut self, text: &str) -> AppResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(AppError::Clipboard("Clipboard write rejected".to_string()));
        }
        state.text = Some(text.to_string());
        state.image = None;
        state.writes += 1;
        Ok(())
    }

    fn write_image(&mut self, image: &ClipboardImage) -> AppResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(AppError::Clipboard("Clipboard write rejected".to_string()));
        }
        state.image = Some(image.clone());
        state.text = None;
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_shares_state() {
        let handle = MemoryClipboard::new();
        let mut backend = handle.clone();

        handle.set_text("hello");
        assert_eq!(backend.read_text().unwrap().as_deref(), Some("hello"));
        assert_eq!(backend.read_image().unwrap(), None);

        backend.write_image(&ClipboardImage::new(1, 1, vec![1, 2, 3, 4])).unwrap();
        assert_eq!(handle.text(), None);
        assert!(handle.image().is_some());
        assert_eq!(handle.write_count(), 1);
    }

    #[test]
    fn test_empty_text_reads_as_none() {
        let handle = MemoryClipboard::new();
        let mut backend = handle.clone();
        handle.set_text("");
        assert_eq!(backend.read_text().unwrap(), None);
    }

    #[test]
    fn test_failure_injection() {
        let handle = MemoryClipboard::new();
        let mut backend = handle.clone();

        handle.fail_reads(true);
        assert!(matches!(backend.read_text(), Err(AppError::Clipboard(_))));
        assert!(matches!(backend.read_image(), Err(AppError::Clipboard(_))));

        handle.fail_writes(true);
        assert!(backend.write_text("x").is_err());
        assert_eq!(handle.write_count(), 0);
    }
}
