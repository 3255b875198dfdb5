use regio_core::{CaptureError, DisplayFrame};

use crate::source::{BYTES_PER_PIXEL, CaptureHandle, CaptureSource, PixelFormat, RawBuffer};

/// Owns a capture source for the lifetime of a capture session.
///
/// Only one pipeline run holds the capturer at a time; it is moved into the
/// worker and handed back when the frame has been taken.
pub struct FrameCapturer {
    source: Box<dyn CaptureSource>,
    width: u32,
    height: u32,
    handle: Option<CaptureHandle>,
}

impl FrameCapturer {
    pub fn new(source: Box<dyn CaptureSource>, width: u32, height: u32) -> Self {
        Self {
            source,
            width,
            height,
            handle: None,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn open(&mut self) -> Result<(), CaptureError> {
        if self.handle.is_some() {
            return Ok(());
        }
        let handle = self
            .source
            .start(self.width, self.height, PixelFormat::Rgba8888)?;
        tracing::info!("Capture started at {}x{}", self.width, self.height);
        self.handle = Some(handle);
        Ok(())
    }

    pub fn capture_frame(&mut self) -> Result<DisplayFrame, CaptureError> {
        let handle = self.handle.ok_or(CaptureError::NotStarted)?;
        let raw = self
            .source
            .pull_latest_frame(handle)?
            .ok_or(CaptureError::NoFrame)?;
        let pixels = strip_padding(raw, self.width, self.height)?;

        DisplayFrame::from_rgba(self.width, self.height, pixels)
            .ok_or_else(|| CaptureError::MalformedFrame("pixel count mismatch".to_string()))
    }

    /// Releases the source. Errors are logged and dropped.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            match self.source.stop(handle) {
                Ok(()) => tracing::info!("Capture stopped"),
                Err(e) => tracing::debug!("Ignoring capture stop error: {}", e),
            }
        }
    }
}

impl Drop for FrameCapturer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Drops row padding so the result is exactly `width * height` RGBA pixels
pub fn strip_padding(raw: RawBuffer, width: u32, height: u32) -> Result<Vec<u8>, CaptureError> {
    let row = width as usize * BYTES_PER_PIXEL;
    let rows = height as usize;

    if raw.pixel_stride != BYTES_PER_PIXEL {
        return Err(CaptureError::MalformedFrame(format!(
            "pixel stride {} is not RGBA8",
            raw.pixel_stride
        )));
    }
    if raw.row_stride < row {
        return Err(CaptureError::MalformedFrame(format!(
            "row stride {} shorter than row {}",
            raw.row_stride, row
        )));
    }
    let needed = match rows {
        0 => 0,
        n => raw.row_stride * (n - 1) + row,
    };
    if raw.data.len() < needed {
        return Err(CaptureError::MalformedFrame(format!(
            "buffer holds {} bytes, need {}",
            raw.data.len(),
            needed
        )));
    }

    if raw.row_stride == row {
        let mut data = raw.data;
        data.truncate(row * rows);
        return Ok(data);
    }

    let mut out = Vec::with_capacity(row * rows);
    for y in 0..rows {
        let start = y * raw.row_stride;
        out.extend_from_slice(&raw.data[start..start + row]);
    }
    Ok(out)
}
