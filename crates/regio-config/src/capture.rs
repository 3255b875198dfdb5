use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSourceKind {
    /// Primary monitor
    #[default]
    Screen,
    /// A still image file standing in for the display
    Image,
}

fn default_view_scale() -> f32 {
    1.0
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CaptureConfig {
    pub source: CaptureSourceKind,
    /// Forced capture width, the source's native size is used when unset
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub image_path: Option<PathBuf>,
    /// Capture pixels per overlay view pixel
    #[serde(default = "default_view_scale")]
    pub view_scale: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: CaptureSourceKind::default(),
            width: None,
            height: None,
            image_path: None,
            view_scale: default_view_scale(),
        }
    }
}

impl CaptureConfig {
    /// Configured scale, or 1.0 when it is not a positive number
    pub fn view_scale(&self) -> f32 {
        if self.view_scale.is_finite() && self.view_scale > 0.0 {
            self.view_scale
        } else {
            default_view_scale()
        }
    }
}
