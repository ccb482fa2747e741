//! Viewer settings, loadable from a JSON file.
//!
//! Every field has a default so a partial file (or no file at all) works.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_egui(&self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(
            (self.r * 255.0) as u8,
            (self.g * 255.0) as u8,
            (self.b * 255.0) as u8,
            (self.a * 255.0) as u8,
        )
    }
}

/// Marker and line appearance for the point overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub marker_radius: f32,
    pub line_width: f32,
    pub marker_color: Color4,
    pub line_color: Color4,
    pub background_gray: u8,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            marker_radius: 2.5,
            line_width: 3.0,
            marker_color: Color4::rgb(1.0, 0.0, 0.0),
            line_color: Color4::rgb(0.0, 1.0, 0.0),
            background_gray: 40,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Multiplicative scale change per wheel notch.
    pub zoom_step: f32,
    /// Explicit scale ceiling. When unset it is derived from the display width.
    pub max_scale: Option<f32>,
    pub max_scale_display_divisor: f32,
    /// Display width assumed when the host monitor size is unknown.
    pub fallback_display_width: f32,
    pub points_file_name: String,
    pub overlay: OverlayStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.2,
            max_scale: None,
            max_scale_display_divisor: 5.0,
            fallback_display_width: 1920.0,
            points_file_name: "points.txt".to_owned(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&data)?;
        if !(config.zoom_step > 1.0) {
            tracing::warn!(zoom_step = config.zoom_step, "zoom_step must exceed 1, using default");
            config.zoom_step = Self::default().zoom_step;
        }
        Ok(config)
    }

    /// Resolve the session-wide scale ceiling. Never below native resolution.
    pub fn resolve_max_scale(&self, display_width: Option<f32>) -> f32 {
        let max = match self.max_scale {
            Some(max) => max,
            None => {
                let width = display_width
                    .filter(|w| *w > 0.0)
                    .unwrap_or(self.fallback_display_width);
                width / self.max_scale_display_divisor.max(f32::EPSILON)
            }
        };
        if max.is_finite() { max.max(1.0) } else { 1.0 }
    }
}
