use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use regio_core::ProcessedImage;
use tempfile::NamedTempFile;

use crate::recognize::Recognizer;

/// Runs the `tesseract` executable on a temporary PNG
pub struct TesseractRecognizer {
    executable: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    /// `language` takes ISO 639-1 codes ("en", "ja") or tesseract names ("eng")
    pub fn new(executable: Option<PathBuf>, language: &str) -> Self {
        Self {
            executable: executable.unwrap_or_else(|| PathBuf::from("tesseract")),
            language: tesseract_language(language).to_string(),
        }
    }

    fn recognize_blocking(executable: PathBuf, language: String, image: ProcessedImage) -> Result<String> {
        let input = NamedTempFile::with_suffix(".png")?;
        image
            .image()
            .save_with_format(input.path(), image::ImageFormat::Png)
            .context("Failed to write OCR input")?;

        let output = Command::new(&executable)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&language)
            .arg("--psm")
            .arg("6") // single uniform block of text
            .output()
            .with_context(|| format!("Failed to run {}", executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait::async_trait]
impl Recognizer for TesseractRecognizer {
    async fn recognize(&self, image: &ProcessedImage) -> Result<String> {
        let executable = self.executable.clone();
        let language = self.language.clone();
        let image = image.clone();

        tokio::task::spawn_blocking(move || Self::recognize_blocking(executable, language, image))
            .await
            .context("OCR task panicked")?
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

fn tesseract_language(code: &str) -> &str {
    match code {
        "en" => "eng",
        "ja" => "jpn",
        "ko" => "kor",
        "zh" => "chi_sim",
        "de" => "deu",
        "fr" => "fra",
        "es" => "spa",
        other => other,
    }
}
