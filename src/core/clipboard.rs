//! Clipboard capture engine
//!
//! A tick flows through the submodules in order:
//! - `detector`: has the clipboard changed since the last tick?
//! - `classifier`: text, link or code (images are tagged directly)
//! - `guard`: drop echoes of our own writes and repeats of the newest entry
//! - `history`: capacity-bounded log, persisted and broadcast on every mutation
//!
//! `monitor` drives the ticks and exposes the user commands (copy, delete, clear).

pub mod classifier;
pub mod detector;
pub mod guard;
pub mod history;
pub mod image;
pub mod monitor;

pub use classifier::classify;
pub use history::{ClipboardHistory, HistoryStorage, InMemoryStorage, JsonFileStorage};
pub use monitor::{CaptureEngine, ClipboardMonitor, TickOutcome};
