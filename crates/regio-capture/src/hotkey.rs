use anyhow::{Context, Result};
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};

/// Overlay button equivalents reachable from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    TranslateOnce,
    ToggleAuto,
}

pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    translate_once: HotKey,
    toggle_auto: HotKey,
}

impl HotkeyManager {
    /// Ctrl+Shift+T translates once, Ctrl+Shift+A toggles auto mode
    pub fn new() -> Result<Self> {
        let modifiers = Modifiers::CONTROL | Modifiers::SHIFT;
        Self::with_hotkeys(
            HotKey::new(Some(modifiers), Code::KeyT),
            HotKey::new(Some(modifiers), Code::KeyA),
        )
    }

    pub fn with_hotkeys(translate_once: HotKey, toggle_auto: HotKey) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        manager
            .register(translate_once)
            .context("Failed to register translate hotkey")?;
        manager
            .register(toggle_auto)
            .context("Failed to register auto hotkey")?;

        Ok(Self {
            manager,
            translate_once,
            toggle_auto,
        })
    }

    /// Non-blocking check for a pressed hotkey
    pub fn poll(&self) -> Option<HotkeyAction> {
        let event = GlobalHotKeyEvent::receiver().try_recv().ok()?;
        if event.state != HotKeyState::Pressed {
            return None;
        }
        if event.id == self.translate_once.id() {
            Some(HotkeyAction::TranslateOnce)
        } else if event.id == self.toggle_auto.id() {
            Some(HotkeyAction::ToggleAuto)
        } else {
            tracing::debug!("Ignoring unknown hotkey id {:?}", event.id);
            None
        }
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        let _ = self.manager.unregister(self.translate_once);
        let _ = self.manager.unregister(self.toggle_auto);
    }
}
