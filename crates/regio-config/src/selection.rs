use regio_types::SelectionRect;
use serde::{Deserialize, Serialize};

fn default_density() -> f32 {
    1.0
}

fn default_handle_radius_dp() -> f32 {
    10.0
}

fn default_min_width_dp() -> f32 {
    80.0
}

fn default_min_height_dp() -> f32 {
    60.0
}

fn default_initial_rect_dp() -> SelectionRect {
    SelectionRect::new(8.0, 8.0, 220.0, 150.0)
}

/// Selection rectangle sizing, expressed in density-independent units
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SelectionConfig {
    /// View pixels per dp
    #[serde(default = "default_density")]
    pub density: f32,
    #[serde(default = "default_handle_radius_dp")]
    pub handle_radius_dp: f32,
    #[serde(default = "default_min_width_dp")]
    pub min_width_dp: f32,
    #[serde(default = "default_min_height_dp")]
    pub min_height_dp: f32,
    #[serde(default = "default_initial_rect_dp")]
    pub initial_rect_dp: SelectionRect,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            handle_radius_dp: default_handle_radius_dp(),
            min_width_dp: default_min_width_dp(),
            min_height_dp: default_min_height_dp(),
            initial_rect_dp: default_initial_rect_dp(),
        }
    }
}

impl SelectionConfig {
    pub fn handle_radius(&self) -> f32 {
        self.handle_radius_dp * self.density
    }

    pub fn min_width(&self) -> f32 {
        self.min_width_dp * self.density
    }

    pub fn min_height(&self) -> f32 {
        self.min_height_dp * self.density
    }

    pub fn initial_rect(&self) -> SelectionRect {
        self.initial_rect_dp.scaled(self.density)
    }
}
