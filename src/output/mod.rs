mod png;

pub use png::{field_to_gray, PngOutput};

use anyhow::Result;
use image::GrayImage;

/// Trait for destinations of mattes and field visualizations
pub trait OutputSink {
    /// Write a single-channel plane under a name
    fn write_plane(&mut self, name: &str, plane: &GrayImage) -> Result<()>;

    /// Get the expected plane resolution
    fn resolution(&self) -> (u32, u32);
}
