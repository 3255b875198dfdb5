use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use regio_core::ProcessedImage;
use windows::{
    Globalization::Language,
    Graphics::Imaging::{BitmapPixelFormat, SoftwareBitmap},
    Media::Ocr::OcrEngine,
    Storage::Streams::DataWriter,
    Win32::Foundation::RPC_E_CHANGED_MODE,
    Win32::System::Com::{COINIT_MULTITHREADED, CoInitializeEx, CoUninitialize},
    core::HSTRING,
};

use crate::recognize::Recognizer;

/// COM initialized on the current thread for one OCR call
pub struct ComScope {
    owned: bool,
}

impl ComScope {
    pub fn enter() -> Result<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        // Thread already lives in another apartment; use it, never uninitialize it
        if hr == RPC_E_CHANGED_MODE {
            return Ok(Self { owned: false });
        }
        hr.ok().context("Failed to initialize COM")?;
        Ok(Self { owned: true })
    }
}

impl Drop for ComScope {
    fn drop(&mut self) {
        if self.owned {
            unsafe { CoUninitialize() };
        }
    }
}

/// Windows.Media.Ocr fed with the greyscale pixels directly
pub struct WindowsOcrRecognizer {
    language: String,
}

impl WindowsOcrRecognizer {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    fn recognize_blocking(language: &str, image: RgbaImage) -> Result<String> {
        let _com = ComScope::enter()?;

        let language = Language::CreateLanguage(&HSTRING::from(language))
            .context("Unknown OCR language")?;
        let engine = OcrEngine::TryCreateFromLanguage(&language)
            .context("No OCR engine for language, is the language pack installed?")?;

        let max = OcrEngine::MaxImageDimension().context("Failed to query OCR limits")?;
        let image = fit_within(image, max);
        let (width, height) = image.dimensions();

        let writer = DataWriter::new().context("Failed to create writer")?;
        writer
            .WriteBytes(&grey_plane(&image))
            .context("Failed to write pixels")?;
        let buffer = writer.DetachBuffer().context("Failed to detach buffer")?;
        let bitmap = SoftwareBitmap::CreateCopyFromBuffer(
            &buffer,
            BitmapPixelFormat::Gray8,
            width as i32,
            height as i32,
        )
        .context("Failed to create bitmap")?;

        let result = engine
            .RecognizeAsync(&bitmap)
            .context("Failed to start recognition")?
            .get()
            .context("Recognition failed")?;

        Ok(result.Text().context("Failed to read text")?.to_string())
    }
}

/// Downscales so neither side exceeds `max`, keeping the aspect ratio
fn fit_within(image: RgbaImage, max: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let longest = width.max(height);
    if max == 0 || longest <= max {
        return image;
    }
    let scale = max as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max);
    imageops::resize(&image, w, h, FilterType::Triangle)
}

/// One byte per pixel; the preprocessed image is already grey so red is enough
fn grey_plane(image: &RgbaImage) -> Vec<u8> {
    image.pixels().map(|p| p[0]).collect()
}

#[async_trait::async_trait]
impl Recognizer for WindowsOcrRecognizer {
    async fn recognize(&self, image: &ProcessedImage) -> Result<String> {
        let language = self.language.clone();
        let pixels = image.image().clone();

        tokio::task::spawn_blocking(move || Self::recognize_blocking(&language, pixels))
            .await
            .context("OCR task panicked")?
    }

    fn name(&self) -> &str {
        "windows-ocr"
    }
}
