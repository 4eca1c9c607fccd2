use serde::{Deserialize, Serialize};
use ts_rs::TS;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;

/// Semantic kind of a captured clipboard value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "clipboard.ts")]
pub enum EntryKind {
    Text,
    Link,
    Code,
    Image,
}

/// One captured clipboard value
///
/// Every field is fixed at capture time. For `EntryKind::Image` the content is
/// a `data:image/png;base64,...` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "clipboard.ts")]
pub struct HistoryEntry {
    pub id: String,
    pub kind: EntryKind,
    pub content: String,
    #[ts(type = "string")]
    pub captured_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry captured now
    pub fn new(kind: EntryKind, content: String) -> Self {
        Self::with_timestamp(kind, content, Utc::now())
    }

    pub fn with_timestamp(kind: EntryKind, content: String, captured_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(captured_at),
            kind,
            content,
            captured_at,
        }
    }

    /// Truncated preview for display and logging
    pub fn preview(&self) -> String {
        match self.kind {
            EntryKind::Image => "[Image]".to_string(),
            _ => preview_text(&self.content, 100),
        }
    }
}

/// Point-in-time copy of the history log, newest first
pub type HistorySnapshot = Arc<Vec<HistoryEntry>>;

/// Raw RGBA image as exposed by the platform clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ClipboardImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self { width, height, rgba }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.rgba.is_empty()
    }
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 8;

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Timestamp (base36 millis) followed by a random base36 suffix
pub fn generate_id(at: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", to_base36(at.timestamp_millis().max(0) as u64), suffix)
}

/// First `max_chars` characters of `text`, with an ellipsis when truncated
pub fn preview_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
