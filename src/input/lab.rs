use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// Image split into 8-bit Lab planes, ready for the matting engine
pub struct LabPlanes {
    pub l: Vec<u8>,
    pub a: Vec<u8>,
    pub b: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Original decoded pixels, kept for compositing the result
    pub rgb: RgbImage,
}

/// Decode an image file and convert it to Lab planes
pub fn load_lab_planes<P: AsRef<Path>>(path: P) -> Result<LabPlanes> {
    let path = path.as_ref();
    let _span = tracing::debug_span!("load_image").entered();

    let rgb = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    tracing::info!("Loaded {} ({}x{})", path.display(), width, height);

    let len = width as usize * height as usize;
    let mut l = Vec::with_capacity(len);
    let mut a = Vec::with_capacity(len);
    let mut b = Vec::with_capacity(len);

    for pixel in rgb.pixels() {
        let [pl, pa, pb] = srgb_to_lab8(pixel[0], pixel[1], pixel[2]);
        l.push(pl);
        a.push(pa);
        b.push(pb);
    }

    Ok(LabPlanes {
        l,
        a,
        b,
        width,
        height,
        rgb,
    })
}

/// D65 reference white
const D65_X: f32 = 0.95047;
const D65_Y: f32 = 1.00000;
const D65_Z: f32 = 1.08883;

/// Linear sRGB to XYZ (D65)
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.119_192, 0.9503041],
];

/// Convert an sRGB pixel to 8-bit CIE Lab (D65)
///
/// Encoding: L scaled from 0..100 to 0..255, a and b offset by 128.
fn srgb_to_lab8(r: u8, g: u8, b: u8) -> [u8; 3] {
    let rgb = [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b)];
    let [x, y, z] = SRGB_TO_XYZ.map(|row| row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]);

    let fx = lab_f(x / D65_X);
    let fy = lab_f(y / D65_Y);
    let fz = lab_f(z / D65_Z);

    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    [
        (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
        (a + 128.0).round().clamp(0.0, 255.0) as u8,
        (b + 128.0).round().clamp(0.0, 255.0) as u8,
    ]
}

#[inline]
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    const DELTA_CUBED: f32 = DELTA * DELTA * DELTA;

    if t > DELTA_CUBED {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_and_white_map_to_lightness_extremes() {
        assert_eq!(srgb_to_lab8(0, 0, 0), [0, 128, 128]);
        let white = srgb_to_lab8(255, 255, 255);
        assert_eq!(white[0], 255);
        assert!((white[1] as i32 - 128).abs() <= 1);
        assert!((white[2] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn red_has_positive_a() {
        let red = srgb_to_lab8(255, 0, 0);
        assert!(red[1] > 180);
    }

    #[test]
    fn mid_gray_lightness_matches_reference() {
        // sRGB 128 gray is L* 53.6
        let gray = srgb_to_lab8(128, 128, 128);
        assert!((gray[0] as i32 - 137).abs() <= 1);
        assert!((gray[1] as i32 - 128).abs() <= 1);
    }
}
