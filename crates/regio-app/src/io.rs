use std::time::Duration;

use kanal::AsyncSender;
use regio_capture::{HotkeyAction, HotkeyManager};
use regio_types::{AppEvent, UiEvent};
use tokio_util::sync::CancellationToken;

/// Global hotkeys mirroring the overlay buttons
pub async fn watcher_io(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let cancel_clone = cancel.clone();

    tokio::task::spawn_blocking(move || {
        let hotkey_manager = match HotkeyManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                tracing::error!("Failed to create hotkey manager: {:#}", e);
                return;
            }
        };

        tracing::info!("Hotkeys registered (Ctrl+Shift+T once, Ctrl+Shift+A auto)");

        while !cancel_clone.is_cancelled() {
            if let Some(action) = hotkey_manager.poll() {
                let event = match action {
                    HotkeyAction::TranslateOnce => UiEvent::TranslateOnce,
                    HotkeyAction::ToggleAuto => UiEvent::ToggleAuto,
                };
                tracing::debug!("Hotkey: {:?}", action);
                if let Err(e) = event_tx.try_send(AppEvent::UiEvent(event)) {
                    tracing::error!("Failed to send hotkey event: {}", e);
                }
            }

            std::thread::sleep(Duration::from_millis(50));
        }

        tracing::info!("Hotkey listener stopping");
    });

    cancel.cancelled().await;
    Ok(())
}
