use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    /// Windows.Media.Ocr
    Windows,
    /// Tesseract command line
    Tesseract,
}

impl Default for OcrEngineKind {
    fn default() -> Self {
        if cfg!(windows) {
            OcrEngineKind::Windows
        } else {
            OcrEngineKind::Tesseract
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    #[serde(default = "default_language")]
    pub language: String,
    /// Tesseract executable, looked up on PATH when unset
    pub tesseract_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::default(),
            language: default_language(),
            tesseract_path: None,
        }
    }
}
