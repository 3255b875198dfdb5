use image::RgbaImage;
use image::imageops;
use regio_types::ScreenRect;

/// One captured display snapshot, packed RGBA8 with no row padding
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    image: RgbaImage,
}

impl DisplayFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Builds a frame from tightly packed RGBA bytes
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Cropped and preprocessed pixels ready for recognition
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    image: RgbaImage,
}

impl ProcessedImage {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Clamps `rect` into the frame so the result is at least 1x1 and never
/// leaves the source bounds.
pub fn clamp_crop_rect(width: u32, height: u32, rect: ScreenRect) -> ScreenRect {
    let w = width.max(1) as i64;
    let h = height.max(1) as i64;

    let left = (rect.left as i64).clamp(0, w - 1);
    let top = (rect.top as i64).clamp(0, h - 1);
    let right = (rect.right as i64).min(w).max(left + 1);
    let bottom = (rect.bottom as i64).min(h).max(top + 1);

    ScreenRect::new(left as i32, top as i32, right as i32, bottom as i32)
}

pub fn safe_crop(frame: &DisplayFrame, rect: ScreenRect) -> DisplayFrame {
    let r = clamp_crop_rect(frame.width(), frame.height(), rect);
    let cropped = imageops::crop_imm(
        frame.image(),
        r.left as u32,
        r.top as u32,
        r.width() as u32,
        r.height() as u32,
    )
    .to_image();
    DisplayFrame::new(cropped)
}
