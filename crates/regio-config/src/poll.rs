use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_interval_ms() -> u64 {
    900
}

fn default_fast_interval_ms() -> u64 {
    500
}

fn default_reset_on_selection_change() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PollMode {
    #[default]
    Standard,
    /// Shorter interval for fast-changing subtitles
    Fast,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PollConfig {
    pub mode: PollMode,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_fast_interval_ms")]
    pub fast_interval_ms: u64,
    /// Forget the last recognized text when the selection moves or resizes
    #[serde(default = "default_reset_on_selection_change")]
    pub reset_on_selection_change: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            mode: PollMode::default(),
            interval_ms: default_interval_ms(),
            fast_interval_ms: default_fast_interval_ms(),
            reset_on_selection_change: default_reset_on_selection_change(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        let ms = match self.mode {
            PollMode::Standard => self.interval_ms,
            PollMode::Fast => self.fast_interval_ms,
        };
        Duration::from_millis(ms.max(1))
    }
}
