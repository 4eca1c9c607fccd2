//! Clipboard history command module
//!
//! The only mutation entry points the UI has besides the capture loop itself.

use tauri::{AppHandle, State};
use crate::core::clipboard::ClipboardMonitor;
use crate::shared::emit::emit_event;
use crate::shared::error::AppResult;
use crate::shared::events::AppEvent;
use crate::shared::types::HistoryEntry;

/// Get clipboard history items, newest first
#[tauri::command]
pub fn get_clipboard_history(monitor: State<ClipboardMonitor>) -> AppResult<Vec<HistoryEntry>> {
    Ok(Vec::clone(&monitor.history()))
}

/// Put a history entry back on the system clipboard
#[tauri::command]
pub fn copy_history_entry(monitor: State<ClipboardMonitor>, id: String) -> AppResult<()> {
    monitor.copy_entry(&id)
}

/// Write a transform result to the clipboard without capturing it
#[tauri::command]
pub fn copy_text_to_clipboard(monitor: State<ClipboardMonitor>, text: String) -> AppResult<()> {
    monitor.copy_text(&text)
}

/// Delete one entry; unknown ids report `false`
#[tauri::command]
pub fn delete_history_entry(monitor: State<ClipboardMonitor>, id: String) -> AppResult<bool> {
    Ok(monitor.delete_entry(&id))
}

/// Clear all clipboard history
#[tauri::command]
pub fn clear_clipboard_history(monitor: State<ClipboardMonitor>) -> AppResult<()> {
    monitor.clear_history();
    Ok(())
}

/// Toggle clipboard monitoring on/off
#[tauri::command]
pub fn toggle_clipboard_monitor(app: AppHandle, monitor: State<ClipboardMonitor>) -> AppResult<bool> {
    let enabled = monitor.toggle();
    emit_event(&app, AppEvent::MonitorToggled(enabled));
    Ok(enabled)
}

/// Get clipboard monitor status
#[tauri::command]
pub fn get_clipboard_monitor_status(monitor: State<ClipboardMonitor>) -> AppResult<bool> {
    Ok(monitor.is_enabled())
}
