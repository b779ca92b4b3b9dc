use anyhow::{bail, Context, Result};
use matting::{Label, Point, Scribble};
use std::path::PathBuf;
use std::str::FromStr;

/// A scribble given on the command line as `fg:PATH` or `bg:PATH`
#[derive(Debug, Clone)]
pub struct ScribbleSpec {
    pub label: Label,
    pub path: PathBuf,
}

impl FromStr for ScribbleSpec {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (label, path) = value
            .split_once(':')
            .ok_or_else(|| format!("expected LABEL:PATH, got '{value}'"))?;
        let label = match label {
            "fg" | "foreground" => Label::Foreground,
            "bg" | "background" => Label::Background,
            other => return Err(format!("unknown scribble label '{other}', use fg or bg")),
        };
        if path.is_empty() {
            return Err("scribble path is empty".to_string());
        }
        Ok(Self {
            label,
            path: PathBuf::from(path),
        })
    }
}

/// Read a scribble mask image; pixels brighter than mid-gray form the
/// scribble, collected in raster order
pub fn load_scribble(spec: &ScribbleSpec, width: u32, height: u32) -> Result<Scribble> {
    let mask = image::open(&spec.path)
        .with_context(|| format!("Failed to decode scribble {}", spec.path.display()))?
        .to_luma8();

    if mask.dimensions() != (width, height) {
        bail!(
            "Scribble {} is {}x{}, image is {}x{}",
            spec.path.display(),
            mask.width(),
            mask.height(),
            width,
            height
        );
    }

    let points: Vec<Point> = mask
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[0] > 127)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect();

    tracing::debug!(
        "Scribble {} ({:?}) has {} pixels",
        spec.path.display(),
        spec.label,
        points.len()
    );

    Ok(Scribble::new(spec.label, points))
}
