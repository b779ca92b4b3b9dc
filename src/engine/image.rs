use crate::error::{MattingError, Result};

/// Owned copy of an image in a perceptually uniform 3-channel color space
///
/// Samples are stored interleaved, one `[l, a, b]` triple per pixel in
/// row-major order. The buffer is never mutated after construction.
#[derive(Debug, Clone)]
pub struct LabImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl LabImage {
    /// Copy three row-major planes of `width * height` samples each
    pub fn from_planes(l: &[u8], a: &[u8], b: &[u8], width: u32, height: u32) -> Result<Self> {
        let len = pixel_count(width, height)?;

        for (channel, plane) in [('L', l), ('A', a), ('B', b)] {
            if plane.len() != len {
                return Err(MattingError::ChannelLength {
                    channel,
                    expected: len,
                    actual: plane.len(),
                });
            }
        }

        let pixels = l
            .iter()
            .zip(a)
            .zip(b)
            .map(|((&l, &a), &b)| [l, a, b])
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color triple at a linear pixel index
    #[inline]
    pub fn color(&self, index: usize) -> [u8; 3] {
        self.pixels[index]
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Linear index of `(x, y)`, or `None` when the point is off the image
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        linear_index(x, y, self.width, self.height)
    }
}

/// Row-major index of `(x, y)` in a `width` by `height` grid
#[inline]
pub(crate) fn linear_index(x: i32, y: i32, width: u32, height: u32) -> Option<usize> {
    if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
        return None;
    }
    Some(y as usize * width as usize + x as usize)
}

/// Euclidean distance between two color triples
#[inline]
pub fn color_distance(p: [u8; 3], q: [u8; 3]) -> f64 {
    let dl = p[0] as f64 - q[0] as f64;
    let da = p[1] as f64 - q[1] as f64;
    let db = p[2] as f64 - q[2] as f64;
    (dl * dl + da * da + db * db).sqrt()
}

/// Validate image dimensions and return the pixel count
pub(crate) fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(MattingError::InvalidDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(MattingError::InvalidDimension { width, height })
}
