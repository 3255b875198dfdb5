//! Runs one capture -> crop -> preprocess -> OCR pass on an image file.
//!
//! cargo run -p regio-capture --bin regio-probe -- <image> [left top right bottom]

use std::sync::Arc;

use anyhow::{Context, Result};
use regio_capture::{CaptureSource, FrameCapturer, ImageFileSource, RecognitionClient, Recognizer};
use regio_core::{ImagePreprocessor, safe_crop};
use regio_types::ScreenRect;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: regio-probe <image> [left top right bottom]")?;
    let coords: Vec<i32> = args.map(|a| a.parse()).collect::<Result<_, _>>()?;

    let source = ImageFileSource::new(&path);
    let (width, height) = source.native_size().context("Unreadable image")?;
    let mut capturer = FrameCapturer::new(Box::new(source), width, height);
    capturer.open()?;

    let start = std::time::Instant::now();
    let frame = capturer.capture_frame()?;
    tracing::info!("1. Captured {}x{} in {:?}", frame.width(), frame.height(), start.elapsed());

    let rect = match coords.as_slice() {
        [l, t, r, b] => ScreenRect::new(*l, *t, *r, *b),
        _ => ScreenRect::new(0, 0, width as i32, height as i32),
    };
    let cropped = safe_crop(&frame, rect);
    tracing::info!("2. Cropped to {}x{}", cropped.width(), cropped.height());

    let start = std::time::Instant::now();
    let processed = ImagePreprocessor::default().preprocess(&cropped);
    tracing::info!(
        "3. Preprocessed to {}x{} in {:?}",
        processed.width(),
        processed.height(),
        start.elapsed()
    );
    processed.image().save("probe_processed.png")?;
    tracing::info!("   Saved to probe_processed.png");

    let client = RecognitionClient::new(default_recognizer());
    let start = std::time::Instant::now();
    let text = client.recognize(&processed).await;
    tracing::info!("4. OCR took {:?}, {} chars", start.elapsed(), text.trim().len());
    for line in text.lines().take(5) {
        tracing::info!("   > {}", line);
    }

    capturer.close();
    Ok(())
}

#[cfg(windows)]
fn default_recognizer() -> Arc<dyn Recognizer> {
    Arc::new(regio_capture::WindowsOcrRecognizer::new("en"))
}

#[cfg(not(windows))]
fn default_recognizer() -> Arc<dyn Recognizer> {
    Arc::new(regio_capture::TesseractRecognizer::new(None, "en"))
}
