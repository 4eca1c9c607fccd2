use serde::{Serialize, Deserialize};
use ts_rs::TS;
use super::types::HistoryEntry;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
#[ts(export, export_to = "events.ts")]
pub enum AppEvent {
    /// Full history, newest first. Listeners re-render from it wholesale.
    #[serde(rename = "clipboard://history")]
    HistoryUpdated(Vec<HistoryEntry>),

    #[serde(rename = "clipboard://monitor")]
    MonitorToggled(bool),
}

impl AppEvent {
    /// Event name used on the webview bus
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::HistoryUpdated(_) => "clipboard://history",
            AppEvent::MonitorToggled(_) => "clipboard://monitor",
        }
    }
}
