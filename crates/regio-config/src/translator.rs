use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "ko".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_deepl_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    #[default]
    Deepl,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct DeepLConfig {
    pub api_key: String,
    /// Free and pro accounts use different hosts
    #[serde(default = "default_deepl_url")]
    pub api_url: String,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_deepl_url(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TranslatorConfig {
    pub enabled: bool,
    pub provider: TranslationProvider,
    /// Empty lets the provider detect the source language
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub deepl: DeepLConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: TranslationProvider::default(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            timeout_ms: default_timeout_ms(),
            deepl: DeepLConfig::default(),
        }
    }
}

impl TranslatorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}
