//! Change detection between ticks
//!
//! [`CaptureCursor`] is the only state carried from one tick to the next. It is
//! owned by the capture loop and never persisted.

use crate::shared::error::AppResult;
use crate::shared::types::ClipboardImage;
use crate::system::clipboard::ClipboardBackend;
use super::image;

/// Last observed clipboard values plus pending self-write suppressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureCursor {
    pub last_observed_text: Option<String>,
    pub last_observed_image_digest: Option<String>,
    pub suppressed_text: Option<String>,
    pub suppressed_image_digest: Option<String>,
}

impl CaptureCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm text suppression ahead of a programmatic write.
    ///
    /// Returns false when the value is already the observed clipboard text: the
    /// detector will not fire for it, so nothing would ever consume the slot.
    pub fn arm_text(&mut self, text: &str) -> bool {
        if self.last_observed_text.as_deref() == Some(text) {
            return false;
        }
        self.suppressed_text = Some(text.to_string());
        true
    }

    /// Arm image suppression by content digest.
    ///
    /// Assumes the platform hands back the same RGBA bytes it was given. Where
    /// it re-encodes (premultiplied alpha, DIB conversion) the echo digest
    /// differs, so the echo is captured and the slot is dropped as stale.
    pub fn arm_image(&mut self, digest: &str) -> bool {
        if self.last_observed_image_digest.as_deref() == Some(digest) {
            return false;
        }
        self.suppressed_image_digest = Some(digest.to_string());
        true
    }

    pub fn disarm_text(&mut self) {
        self.suppressed_text = None;
    }

    pub fn disarm_image(&mut self) {
        self.suppressed_image_digest = None;
    }

    /// Consume the text slot for a fired text candidate, returning whether it
    /// was the echo. A slot that does not match is stale and is dropped too:
    /// the clipboard moved on before our write was observed.
    pub fn consume_suppressed_text(&mut self, text: &str) -> bool {
        self.suppressed_text.take().is_some_and(|armed| armed == text)
    }

    pub fn consume_suppressed_image(&mut self, digest: &str) -> bool {
        self.suppressed_image_digest.take().is_some_and(|armed| armed == digest)
    }
}

/// A clipboard value that changed since the previous tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Text(String),
    Image { image: ClipboardImage, digest: String },
}

/// Compare the clipboard against the cursor and fire at most one candidate.
///
/// Text has priority; the image channel is only read when no text candidate
/// fired. Observed values are updated whenever a candidate fires, regardless
/// of what later stages decide. A read failure leaves the cursor untouched.
pub fn detect(
    cursor: &mut CaptureCursor,
    clipboard: &mut dyn ClipboardBackend,
) -> AppResult<Option<Candidate>> {
    let text = clipboard.read_text()?.filter(|t| !t.is_empty());

    if let Some(text) = &text {
        if cursor.last_observed_text.as_deref() != Some(text.as_str()) {
            cursor.last_observed_text = Some(text.clone());
            // New text replaced whatever image was there; a later re-copy of
            // that image must fire again
            cursor.last_observed_image_digest = None;
            return Ok(Some(Candidate::Text(text.clone())));
        }
    }

    if let Some(image) = clipboard.read_image()?.filter(|i| !i.is_empty()) {
        let digest = image::digest(&image);
        if cursor.last_observed_image_digest.as_deref() != Some(digest.as_str()) {
            cursor.last_observed_image_digest = Some(digest.clone());
            if text.is_none() {
                cursor.last_observed_text = None;
            }
            return Ok(Some(Candidate::Image { image, digest }));
        }
    }

    Ok(None)
}
