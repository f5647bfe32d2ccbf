//! Configuration persistence for chartmarks settings

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        PALETTE[0]
    }
}

impl ShapeColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }

    /// Same color with the given alpha (0.0-1.0)
    pub fn to_rgba_u8_with_alpha(self, alpha: f32) -> [u8; 4] {
        let [r, g, b, _] = self.to_rgba_u8();
        [r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8]
    }

    /// Black or white, whichever reads better on top of this color
    pub fn contrasting(self) -> Self {
        let luma = 0.299 * self.r + 0.587 * self.g + 0.114 * self.b;
        if luma > 0.6 {
            ShapeColor::new(0.0, 0.0, 0.0)
        } else {
            ShapeColor::new(1.0, 1.0, 1.0)
        }
    }
}

/// Fixed drawing palette offered by the tool bar
pub const PALETTE: [ShapeColor; 6] = [
    // Blue
    ShapeColor::new(0.16, 0.38, 1.0),
    // Red
    ShapeColor::new(0.95, 0.21, 0.27),
    // Green
    ShapeColor::new(0.03, 0.6, 0.51),
    // Orange
    ShapeColor::new(1.0, 0.6, 0.0),
    // Purple
    ShapeColor::new(0.61, 0.15, 0.69),
    // Grey
    ShapeColor::new(0.47, 0.48, 0.53),
];

/// Palette entry by index, wrapping around
pub fn palette_color(index: usize) -> ShapeColor {
    PALETTE[index % PALETTE.len()]
}

/// Annotator settings persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Radius in pixels within which a click grabs a control point
    pub point_tolerance: f32,
    /// Distance in pixels within which a click lands on a shape body
    pub line_tolerance: f32,
    /// Stroke weight for new drawings
    pub line_width: f32,
    /// Palette entry used for new drawings
    pub color_index: usize,
    /// Radius of the handles drawn on the selected drawing
    pub handle_radius: f32,
    /// Radius of the arc drawn at the origin of a trend angle
    pub angle_arc_radius: f32,
    /// Alpha of the band between the two lines of a flat channel (0.0-1.0)
    pub channel_fill_opacity: f32,
    /// Decimals shown in price labels
    pub price_decimals: usize,
    /// chrono format string for time labels
    pub time_format: String,
    /// Hit-test channel, pitchfork and cross-line bodies, not only their control points
    pub full_body_hit_testing: bool,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            point_tolerance: 10.0,
            line_tolerance: 5.0,
            line_width: 2.0,
            color_index: 0,
            handle_radius: 5.0,
            angle_arc_radius: 30.0,
            channel_fill_opacity: 0.15,
            price_decimals: 2,
            time_format: "%Y-%m-%d %H:%M".to_string(),
            full_body_hit_testing: true,
        }
    }
}

impl AnnotatorConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "chartmarks";

    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    /// Read a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Write a config file, creating its parent directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, raw).with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// Color for new drawings
    pub fn color(&self) -> ShapeColor {
        palette_color(self.color_index)
    }
}
