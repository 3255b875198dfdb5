use std::env;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::logging::LoggingConfig;
use self::ocr::OcrConfig;
use self::poll::PollConfig;
use self::selection::SelectionConfig;
use self::translator::TranslatorConfig;
use self::ui::UiConfig;

pub mod capture;
pub mod logging;
pub mod ocr;
pub mod poll;
pub mod selection;
pub mod translator;
pub mod ui;

#[derive(Serialize, Deserialize, Clone, Default, Debug)]
#[serde(default)]
pub struct Config {
    pub selection: SelectionConfig,
    pub capture: CaptureConfig,
    pub poll: PollConfig,
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Apply environment overrides on top of whatever was loaded
    pub fn apply_env(&mut self) {
        if let Some(interval) = env::var("REGIO_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.poll.interval_ms = interval;
        }

        if let Ok(key) = env::var("DEEPL_API_KEY")
            && !key.is_empty()
        {
            self.translator.deepl.api_key = key;
            self.translator.enabled = true;
        }

        if let Ok(level) = env::var("REGIO_LOG") {
            self.logging.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::PollMode;

    #[test]
    fn empty_json_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.poll.interval_ms, 900);
        assert_eq!(config.poll.fast_interval_ms, 500);
        assert_eq!(config.poll.mode, PollMode::Standard);
        assert!(config.poll.reset_on_selection_change);
        assert_eq!(config.selection.handle_radius_dp, 10.0);
        assert_eq!(config.ui.no_text, ui::UiConfig::default().no_text);
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "poll": { "mode": "fast" }, "selection": { "density": 2.0 } }"#)
                .unwrap();
        assert_eq!(config.poll.mode, PollMode::Fast);
        assert_eq!(config.poll.interval().as_millis(), 500);
        assert_eq!(config.selection.min_width(), 160.0);
        assert_eq!(config.selection.min_height_dp, 60.0);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.translator.target_lang, config.translator.target_lang);
        assert_eq!(back.capture.source, config.capture.source);
    }

    #[test]
    fn nested_deepl_section_fills_gaps() {
        let config: Config =
            serde_json::from_str(r#"{ "translator": { "enabled": true, "deepl": { "api_key": "k:fx" } } }"#)
                .unwrap();
        assert!(config.translator.enabled);
        assert_eq!(config.translator.deepl.api_key, "k:fx");
        assert!(config.translator.deepl.api_url.ends_with("/v2/translate"));
        assert_eq!(config.translator.timeout().as_secs(), 10);
        assert_eq!(config.translator.source_lang, "en");
    }
}
