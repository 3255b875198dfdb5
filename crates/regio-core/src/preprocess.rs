use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::SharpenError;
use crate::frame::{DisplayFrame, ProcessedImage};

pub const UPSCALE_FACTOR: f32 = 1.6;
pub const CONTRAST: f32 = 1.15;
/// Upscaled images above this many pixels go to OCR unsharpened
pub const MAX_SHARPEN_PIXELS: u64 = 40_000_000;

// Luminance weights of a zero-saturation colour matrix
const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

/// OCR preparation: upscale, greyscale with a contrast boost, light sharpen.
///
/// The pipeline is deterministic, the same input always yields the same bytes.
#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    pub scale: f32,
    pub contrast: f32,
    pub max_sharpen_pixels: u64,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self {
            scale: UPSCALE_FACTOR,
            contrast: CONTRAST,
            max_sharpen_pixels: MAX_SHARPEN_PIXELS,
        }
    }
}

impl ImagePreprocessor {
    pub fn preprocess(&self, frame: &DisplayFrame) -> ProcessedImage {
        let scaled = self.upscale(frame.image());
        let boosted = self.grey_contrast(scaled);

        match self.try_sharpen(&boosted) {
            Ok(sharp) => ProcessedImage::new(sharp),
            Err(e) => {
                tracing::warn!("sharpen skipped: {}", e);
                ProcessedImage::new(boosted)
            }
        }
    }

    fn try_sharpen(&self, image: &RgbaImage) -> Result<RgbaImage, SharpenError> {
        let pixels = image.width() as u64 * image.height() as u64;
        if pixels > self.max_sharpen_pixels {
            return Err(SharpenError::TooLarge {
                pixels,
                limit: self.max_sharpen_pixels,
            });
        }
        sharpen(image)
    }

    fn upscale(&self, src: &RgbaImage) -> RgbaImage {
        let width = scaled_dim(src.width(), self.scale);
        let height = scaled_dim(src.height(), self.scale);
        imageops::resize(src, width, height, FilterType::Triangle)
    }

    /// Full desaturation followed by `contrast * v + t`, alpha untouched
    pub fn grey_contrast(&self, mut image: RgbaImage) -> RgbaImage {
        let t = (-0.5 * self.contrast + 0.5) * 255.0;

        for pixel in image.pixels_mut() {
            let [r, g, b, _] = pixel.0;
            let grey = LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32;
            let v = (self.contrast * grey + t).round().clamp(0.0, 255.0) as u8;
            pixel.0[0] = v;
            pixel.0[1] = v;
            pixel.0[2] = v;
        }

        image
    }
}

fn scaled_dim(dim: u32, scale: f32) -> u32 {
    ((dim as f32 * scale).round() as u32).max(1)
}

/// 3x3 sharpen `[[0,-1,0],[-1,5,-1],[0,-1,0]]` on RGB. Border pixels are
/// copied unchanged. Fails only when the output buffer cannot be allocated.
pub fn sharpen(src: &RgbaImage) -> Result<RgbaImage, SharpenError> {
    let (w, h) = src.dimensions();
    let (w, h) = (w as usize, h as usize);
    let input = src.as_raw();

    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(input.len())?;
    out.extend_from_slice(input);

    if w >= 3 && h >= 3 {
        let stride = w * 4;
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let i = y * stride + x * 4;
                for c in 0..3 {
                    let v = 5 * input[i + c] as i32
                        - input[i - stride + c] as i32
                        - input[i + stride + c] as i32
                        - input[i - 4 + c] as i32
                        - input[i + 4 + c] as i32;
                    out[i + c] = v.clamp(0, 255) as u8;
                }
            }
        }
    }

    // Buffer length matches the source dimensions by construction
    Ok(RgbaImage::from_raw(src.width(), src.height(), out).unwrap_or_else(|| src.clone()))
}
