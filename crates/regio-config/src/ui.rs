use serde::{Deserialize, Serialize};

fn default_max_text_lines() -> u32 {
    3
}

fn default_capture_failed() -> String {
    "Capture failed (check permission/state)".to_string()
}

fn default_no_text() -> String {
    "No text detected.".to_string()
}

fn default_no_result() -> String {
    "(no translation result)".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_max_text_lines")]
    pub max_text_lines: u32,
    #[serde(default = "default_capture_failed")]
    pub capture_failed: String,
    #[serde(default = "default_no_text")]
    pub no_text: String,
    /// Placeholder shown when translation comes back blank
    #[serde(default = "default_no_result")]
    pub no_result: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            max_text_lines: default_max_text_lines(),
            capture_failed: default_capture_failed(),
            no_text: default_no_text(),
            no_result: default_no_result(),
        }
    }
}
