use std::sync::Arc;

use anyhow::{Context, bail};
use regio_capture::{CaptureSource, FrameCapturer, ImageFileSource, Recognizer, TesseractRecognizer};
use regio_config::capture::{CaptureConfig, CaptureSourceKind};
use regio_config::ocr::{OcrConfig, OcrEngineKind};
use regio_config::translator::{TranslationProvider, TranslatorConfig};
use regio_translator::{DeepLTranslator, TranslationClient};

pub fn build_capturer(config: &CaptureConfig) -> anyhow::Result<FrameCapturer> {
    let source: Box<dyn CaptureSource> = match config.source {
        CaptureSourceKind::Image => {
            let path = config
                .image_path
                .as_ref()
                .context("capture.image_path is required for the image source")?;
            Box::new(ImageFileSource::new(path))
        }
        CaptureSourceKind::Screen => screen_source()?,
    };

    let native = source.native_size();
    let width = config.width.or(native.map(|(w, _)| w));
    let height = config.height.or(native.map(|(_, h)| h));
    let (Some(width), Some(height)) = (width, height) else {
        bail!("Cannot determine capture size, set capture.width and capture.height");
    };
    if width == 0 || height == 0 {
        bail!("Capture size {width}x{height} is empty");
    }

    tracing::info!("Capture source {:?} at {}x{}", config.source, width, height);
    Ok(FrameCapturer::new(source, width, height))
}

#[cfg(feature = "desktop")]
fn screen_source() -> anyhow::Result<Box<dyn CaptureSource>> {
    Ok(Box::new(regio_capture::ScreenSource::primary()))
}

#[cfg(not(feature = "desktop"))]
fn screen_source() -> anyhow::Result<Box<dyn CaptureSource>> {
    bail!("Screen capture needs the `desktop` feature, use --image <file> instead")
}

pub fn build_recognizer(config: &OcrConfig) -> anyhow::Result<Arc<dyn Recognizer>> {
    match config.engine {
        OcrEngineKind::Windows => windows_recognizer(&config.language),
        OcrEngineKind::Tesseract => Ok(Arc::new(TesseractRecognizer::new(
            config.tesseract_path.clone(),
            &config.language,
        ))),
    }
}

#[cfg(windows)]
fn windows_recognizer(language: &str) -> anyhow::Result<Arc<dyn Recognizer>> {
    Ok(Arc::new(regio_capture::WindowsOcrRecognizer::new(language)))
}

#[cfg(not(windows))]
fn windows_recognizer(_language: &str) -> anyhow::Result<Arc<dyn Recognizer>> {
    bail!("The windows OCR engine is only available on Windows, use \"tesseract\"")
}

pub fn build_translator(config: &TranslatorConfig) -> TranslationClient {
    if !config.enabled {
        tracing::info!("Translator disabled, recognized text will not be translated");
        return TranslationClient::disabled();
    }

    let provider = match config.provider {
        TranslationProvider::Deepl => {
            if config.deepl.api_key.is_empty() {
                tracing::warn!("DeepL enabled without an API key, disabling translation");
                return TranslationClient::disabled();
            }
            DeepLTranslator::new(
                config.deepl.api_key.clone(),
                config.deepl.api_url.clone(),
                config.timeout(),
            )
        }
    };

    match provider {
        Ok(provider) => TranslationClient::new(
            Arc::new(provider),
            config.source_lang.clone(),
            config.target_lang.clone(),
        ),
        Err(e) => {
            tracing::warn!("Failed to set up translator: {}", e);
            TranslationClient::disabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn image_source_takes_native_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        RgbaImage::from_pixel(64, 48, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let config = CaptureConfig {
            source: CaptureSourceKind::Image,
            image_path: Some(path),
            ..Default::default()
        };
        let capturer = build_capturer(&config).unwrap();
        assert_eq!(capturer.dimensions(), (64, 48));
    }

    #[test]
    fn forced_size_overrides_native() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.png");
        RgbaImage::new(64, 48).save(&path).unwrap();

        let config = CaptureConfig {
            source: CaptureSourceKind::Image,
            image_path: Some(path),
            width: Some(32),
            height: Some(24),
            ..Default::default()
        };
        assert_eq!(build_capturer(&config).unwrap().dimensions(), (32, 24));
    }

    #[test]
    fn image_source_without_path_fails() {
        let config = CaptureConfig {
            source: CaptureSourceKind::Image,
            ..Default::default()
        };
        assert!(build_capturer(&config).is_err());
    }

    #[test]
    fn translator_needs_key() {
        let mut config = TranslatorConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(!build_translator(&config).is_enabled());

        config.deepl.api_key = "key:fx".to_string();
        assert!(build_translator(&config).is_enabled());

        config.enabled = false;
        assert!(!build_translator(&config).is_enabled());
    }

    #[test]
    fn tesseract_engine_always_builds() {
        let config = OcrConfig {
            engine: OcrEngineKind::Tesseract,
            ..Default::default()
        };
        assert_eq!(build_recognizer(&config).unwrap().name(), "tesseract");
    }
}
