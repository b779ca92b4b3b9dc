use super::OutputSink;
use anyhow::{bail, Context, Result};
use image::{GrayImage, Luma, RgbImage};
use std::path::{Path, PathBuf};

/// Writes planes as 8-bit grayscale PNG files
///
/// The plane named `mask` goes to the primary output path; every other plane
/// goes to `<dump_dir>/<name>.png` when a dump directory is set.
pub struct PngOutput {
    mask_path: PathBuf,
    dump_dir: Option<PathBuf>,
    width: u32,
    height: u32,
}

impl PngOutput {
    pub fn new<P: AsRef<Path>>(
        mask_path: P,
        dump_dir: Option<PathBuf>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        if let Some(dir) = &dump_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create dump directory {}", dir.display()))?;
        }

        Ok(Self {
            mask_path: mask_path.as_ref().to_path_buf(),
            dump_dir,
            width,
            height,
        })
    }

    pub fn dumps_fields(&self) -> bool {
        self.dump_dir.is_some()
    }

    /// Write the source image with background pixels blacked out
    pub fn write_composite(&mut self, rgb: &RgbImage, mask: &[u8]) -> Result<()> {
        let (width, height) = rgb.dimensions();
        let composite = RgbImage::from_fn(width, height, |x, y| {
            let idx = y as usize * width as usize + x as usize;
            if mask[idx] > 0 {
                *rgb.get_pixel(x, y)
            } else {
                image::Rgb([0, 0, 0])
            }
        });

        composite
            .save(&self.mask_path)
            .with_context(|| format!("Failed to write {}", self.mask_path.display()))?;
        tracing::info!("Wrote composite to {}", self.mask_path.display());
        Ok(())
    }
}

impl OutputSink for PngOutput {
    fn write_plane(&mut self, name: &str, plane: &GrayImage) -> Result<()> {
        if plane.dimensions() != (self.width, self.height) {
            bail!(
                "Plane {} is {}x{}, expected {}x{}",
                name,
                plane.width(),
                plane.height(),
                self.width,
                self.height
            );
        }

        let path = if name == "mask" {
            self.mask_path.clone()
        } else {
            match &self.dump_dir {
                Some(dir) => dir.join(format!("{name}.png")),
                None => return Ok(()),
            }
        };

        plane
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {} to {}", name, path.display());
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Map a scalar field to grayscale, stretching its finite range to 0-255
///
/// `+inf` (unreached distance) is drawn white and `-inf` (minimum
/// log-likelihood) black.
pub fn field_to_gray(values: &[f64], width: u32, height: u32) -> GrayImage {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = if max > min { max - min } else { 1.0 };

    GrayImage::from_fn(width, height, |x, y| {
        let value = values[y as usize * width as usize + x as usize];
        let level = if value.is_finite() {
            ((value - min) / span * 255.0).clamp(0.0, 255.0) as u8
        } else if value > 0.0 {
            255
        } else {
            0
        };
        Luma([level])
    })
}
