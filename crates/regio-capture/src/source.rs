use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use regio_core::CaptureError;

pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed RGBA, 8 bits per channel
    Rgba8888,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureHandle(pub u64);

/// Raw pixels as delivered by a source. Rows may carry trailing padding.
#[derive(Debug, Clone)]
pub struct RawBuffer {
    pub data: Vec<u8>,
    pub row_stride: usize,
    pub pixel_stride: usize,
}

impl RawBuffer {
    pub fn packed(image: RgbaImage) -> Self {
        let row_stride = image.width() as usize * BYTES_PER_PIXEL;
        Self {
            data: image.into_raw(),
            row_stride,
            pixel_stride: BYTES_PER_PIXEL,
        }
    }
}

/// Full-display frame producer
pub trait CaptureSource: Send {
    fn start(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<CaptureHandle, CaptureError>;

    /// Latest available frame, `None` when nothing is ready yet
    fn pull_latest_frame(&mut self, handle: CaptureHandle)
    -> Result<Option<RawBuffer>, CaptureError>;

    fn stop(&mut self, handle: CaptureHandle) -> Result<(), CaptureError>;

    /// Size the source would capture at when not told otherwise
    fn native_size(&self) -> Option<(u32, u32)> {
        None
    }
}

/// Start/stop/pull counters, shared with whoever created the source
#[derive(Debug, Default)]
pub struct SourceStats {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub pulls: AtomicUsize,
}

impl SourceStats {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }
}

/// In-memory source serving a fixed image, optionally with row padding
pub struct SyntheticSource {
    frame: RgbaImage,
    row_padding: usize,
    ready: bool,
    active: Option<CaptureHandle>,
    next_handle: u64,
    stats: Arc<SourceStats>,
}

impl SyntheticSource {
    pub fn new(frame: RgbaImage) -> Self {
        Self {
            frame,
            row_padding: 0,
            ready: true,
            active: None,
            next_handle: 1,
            stats: Arc::new(SourceStats::default()),
        }
    }

    /// Pad every row with `bytes` junk bytes
    pub fn with_row_padding(mut self, bytes: usize) -> Self {
        self.row_padding = bytes;
        self
    }

    /// Never has a frame ready
    pub fn unavailable(mut self) -> Self {
        self.ready = false;
        self
    }

    pub fn stats(&self) -> Arc<SourceStats> {
        self.stats.clone()
    }

    fn padded(&self) -> RawBuffer {
        let row = self.frame.width() as usize * BYTES_PER_PIXEL;
        let row_stride = row + self.row_padding;
        let mut data = Vec::with_capacity(row_stride * self.frame.height() as usize);
        for chunk in self.frame.as_raw().chunks_exact(row) {
            data.extend_from_slice(chunk);
            data.resize(data.len() + self.row_padding, 0xAB);
        }
        RawBuffer {
            data,
            row_stride,
            pixel_stride: BYTES_PER_PIXEL,
        }
    }
}

impl CaptureSource for SyntheticSource {
    fn start(
        &mut self,
        width: u32,
        height: u32,
        _format: PixelFormat,
    ) -> Result<CaptureHandle, CaptureError> {
        if (width, height) != self.frame.dimensions() {
            return Err(CaptureError::Source(format!(
                "synthetic frame is {}x{}, asked for {}x{}",
                self.frame.width(),
                self.frame.height(),
                width,
                height
            )));
        }
        let handle = CaptureHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(handle);
        self.stats.starts.fetch_add(1, Ordering::SeqCst);
        Ok(handle)
    }

    fn pull_latest_frame(
        &mut self,
        handle: CaptureHandle,
    ) -> Result<Option<RawBuffer>, CaptureError> {
        if self.active != Some(handle) {
            return Err(CaptureError::NotStarted);
        }
        self.stats.pulls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ready.then(|| self.padded()))
    }

    fn stop(&mut self, handle: CaptureHandle) -> Result<(), CaptureError> {
        if self.active.take() != Some(handle) {
            return Err(CaptureError::NotStarted);
        }
        self.stats.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn native_size(&self) -> Option<(u32, u32)> {
        Some(self.frame.dimensions())
    }
}

/// Serves a still image file as the display, resized to the started size
pub struct ImageFileSource {
    path: PathBuf,
    native: Option<(u32, u32)>,
    frame: Option<RgbaImage>,
}

impl ImageFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let native = image::image_dimensions(&path).ok();
        Self {
            path,
            native,
            frame: None,
        }
    }
}

impl CaptureSource for ImageFileSource {
    fn start(
        &mut self,
        width: u32,
        height: u32,
        _format: PixelFormat,
    ) -> Result<CaptureHandle, CaptureError> {
        let image = image::open(&self.path)
            .map_err(|e| CaptureError::Source(format!("{}: {}", self.path.display(), e)))?
            .to_rgba8();

        let image = if image.dimensions() == (width, height) {
            image
        } else {
            imageops::resize(&image, width.max(1), height.max(1), FilterType::Triangle)
        };

        tracing::debug!("Image source {} started at {}x{}", self.path.display(), width, height);
        self.frame = Some(image);
        Ok(CaptureHandle(0))
    }

    fn pull_latest_frame(
        &mut self,
        _handle: CaptureHandle,
    ) -> Result<Option<RawBuffer>, CaptureError> {
        let frame = self.frame.as_ref().ok_or(CaptureError::NotStarted)?;
        Ok(Some(RawBuffer::packed(frame.clone())))
    }

    fn stop(&mut self, _handle: CaptureHandle) -> Result<(), CaptureError> {
        self.frame.take().map(|_| ()).ok_or(CaptureError::NotStarted)
    }

    fn native_size(&self) -> Option<(u32, u32)> {
        self.native
    }
}
