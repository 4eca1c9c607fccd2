use tauri::{AppHandle, Emitter};
use super::events::AppEvent;

/// Emit an application event to all windows
pub fn emit_event(app: &AppHandle, event: AppEvent) {
    let name = event.name();
    let result = match &event {
        AppEvent::HistoryUpdated(entries) => app.emit(name, entries),
        AppEvent::MonitorToggled(enabled) => app.emit(name, enabled),
    };
    if let Err(e) = result {
        log::warn!("Failed to emit {}: {}", name, e);
    }
}
