//! Console configuration.
//!
//! A [`GridConfig`] describes the console: how many cells it has and how large a cell is in
//! device-independent pixels. Configurations are plain `serde` values and can be loaded from JSON.
//! Missing fields fall back to their defaults.
//!
//! ```rust
//! use deltacon::config::GridConfig;
//!
//! let config = GridConfig::from_json_str(r#"{ "grid_width": 80, "grid_height": 25 }"#).unwrap();
//! assert_eq!(config.grid_width, 80);
//! assert_eq!(config.tile_width, 20);
//! assert_eq!(config.window_size(1.5), (80 * 30, 25 * 30));
//! ```

use crate::error::{ConsoleError, Result};
use crate::rendering::renderer::TileMetrics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width of a tile in pixels, before DPI scaling.
    pub tile_width: u32,
    /// Height of a tile in pixels, before DPI scaling.
    pub tile_height: u32,
    /// Number of columns.
    pub grid_width: usize,
    /// Number of rows.
    pub grid_height: usize,
    /// Draw glyphs in tiles of half the width.
    pub half_width: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_width: 20,
            tile_height: 20,
            grid_width: 64,
            grid_height: 36,
            half_width: false,
        }
    }
}

impl GridConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(ConsoleError::InvalidConfig(format!(
                "tile size must not be zero, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConsoleError::InvalidConfig(format!(
                "grid size must not be zero, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        Ok(())
    }

    pub fn tile_metrics(&self, scale: f64) -> TileMetrics {
        TileMetrics::new(self.tile_width, self.tile_height, scale)
    }

    /// The pixel size of the whole console at the given DPI scale.
    pub fn window_size(&self, scale: f64) -> (u32, u32) {
        let tiles = self.tile_metrics(scale);
        let mut tile_width = tiles.scaled_width();
        if self.half_width {
            tile_width = (tile_width / 2).max(1);
        }
        (
            tile_width.saturating_mul(self.grid_width as u32),
            tiles.scaled_height().saturating_mul(self.grid_height as u32),
        )
    }
}
