//! Clipdock - clipboard capture engine
//!
//! Polls the system clipboard, classifies new values, drops echoes of its own
//! writes and repeats of the newest entry, and keeps a capacity-bounded history
//! persisted as JSON. The Tauri desktop shell lives behind the `desktop` feature.

pub mod shared;
pub mod core;
pub mod system;
#[cfg(feature = "desktop")]
mod api;

pub use crate::core::clipboard::{classify, CaptureEngine, ClipboardHistory, ClipboardMonitor, TickOutcome};
pub use crate::shared::error::{AppError, AppResult};
pub use crate::shared::settings::EngineSettings;
pub use crate::shared::types::{ClipboardImage, EntryKind, HistoryEntry, HistorySnapshot};
pub use crate::system::clipboard::{ClipboardBackend, MemoryClipboard, SystemClipboard};

#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use crate::shared::emit::emit_event;
    use crate::shared::events::AppEvent;

    tauri::Builder::default()
        .plugin(shared::logging::get_builder().build())
        .setup(|app| {
            // Settings are needed before the engine exists, so load them up front
            let settings = tauri::async_runtime::block_on(EngineSettings::load())
                .unwrap_or_else(|e| {
                    log::warn!("Failed to load settings, using defaults: {}", e);
                    EngineSettings::default()
                });

            let monitor = ClipboardMonitor::from_settings(&settings, Box::new(SystemClipboard::new()));
            let mut snapshots = monitor.subscribe();

            // Must manage state before any command can run
            app.manage(monitor.clone());

            tauri::async_runtime::spawn(monitor.run());

            // Push every committed history to the webview
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                while snapshots.changed().await.is_ok() {
                    let entries = (**snapshots.borrow_and_update()).clone();
                    emit_event(&handle, AppEvent::HistoryUpdated(entries));
                }
            });

            log::info!("✅ Clipboard monitoring started");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            api::commands::clipboard::get_clipboard_history,
            api::commands::clipboard::copy_history_entry,
            api::commands::clipboard::copy_text_to_clipboard,
            api::commands::clipboard::delete_history_entry,
            api::commands::clipboard::clear_clipboard_history,
            api::commands::clipboard::toggle_clipboard_monitor,
            api::commands::clipboard::get_clipboard_monitor_status,
        ])
        .run(tauri::generate_context!())
        .unwrap_or_else(|e| {
            eprintln!("FATAL: Failed to start Tauri application: {}", e);
            std::process::exit(1);
        });
}
