//! Admission checks between detection and insertion
//!
//! Two ways to be turned away: the value is an echo of our own clipboard write,
//! or it is identical to the current head of history. Only the head is checked;
//! an older identical entry does not block a fresh capture.

use crate::shared::types::{EntryKind, HistoryEntry};
use super::detector::{CaptureCursor, Candidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    /// Echo of a programmatic write; the suppression slot has been consumed
    Suppressed,
    /// Same kind and content as the newest entry
    Duplicate,
}

/// Decide whether a classified candidate may enter history.
///
/// Suppression is checked first: the candidate's channel slot is emptied on
/// every fire, matching or not, so it can never outlive the next change.
pub fn admit(
    cursor: &mut CaptureCursor,
    candidate: &Candidate,
    kind: EntryKind,
    content: &str,
    head: Option<&HistoryEntry>,
) -> Verdict {
    let suppressed = match candidate {
        Candidate::Text(text) => cursor.consume_suppressed_text(text),
        Candidate::Image { digest, .. } => cursor.consume_suppressed_image(digest),
    };
    if suppressed {
        return Verdict::Suppressed;
    }

    if let Some(head) = head {
        if head.kind == kind && head.content == content {
            return Verdict::Duplicate;
        }
    }

    Verdict::Admit
}
