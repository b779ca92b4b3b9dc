use ndarray::{Array3, Axis};

/// Density of one class over the quantized color space
///
/// Stored as a lookup table with one cell per color bin, so evaluating the
/// density at a pixel is a single index rather than a per-pixel sum.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorDistribution {
    /// No samples yet; every color is equally likely
    Unknown { bins: usize },
    /// Normalized smoothed histogram; cells sum to 1
    Estimated { table: Array3<f64> },
}

impl ColorDistribution {
    pub fn unknown(bins: usize) -> Self {
        ColorDistribution::Unknown { bins }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, ColorDistribution::Estimated { .. })
    }

    /// Density of the bin containing `color`
    #[inline]
    pub fn density(&self, color: [u8; 3]) -> f64 {
        match self {
            ColorDistribution::Unknown { bins } => 1.0 / (bins * bins * bins) as f64,
            ColorDistribution::Estimated { table } => {
                let bins = table.len_of(Axis(0));
                table[[
                    bin_of(color[0], bins),
                    bin_of(color[1], bins),
                    bin_of(color[2], bins),
                ]]
            }
        }
    }
}

/// Builds a [`ColorDistribution`] from the colors under a class's scribbles
///
/// The histogram is smoothed separably with a truncated Gaussian, which makes
/// it a binned kernel density estimate with a fixed bandwidth.
#[derive(Debug, Clone)]
pub struct DensityEstimator {
    bins: usize,
    kernel: Vec<f64>,
}

impl DensityEstimator {
    /// # Arguments
    /// * `bins` - Bins per channel
    /// * `bandwidth` - Kernel standard deviation in bins; zero disables smoothing.
    ///   The kernel never reaches further than `bins - 1` cells
    pub fn new(bins: usize, bandwidth: f64) -> Self {
        Self {
            bins,
            kernel: gaussian_kernel(bandwidth, bins.saturating_sub(1)),
        }
    }

    /// Rebuild a density from scratch
    ///
    /// Cost depends on the number of samples and the bin count only, never on
    /// the image size.
    pub fn estimate(&self, samples: impl IntoIterator<Item = [u8; 3]>) -> ColorDistribution {
        let _span = tracing::debug_span!("estimate_density").entered();

        let bins = self.bins;
        let mut table = Array3::<f64>::zeros((bins, bins, bins));
        let mut count = 0usize;

        for color in samples {
            table[[
                bin_of(color[0], bins),
                bin_of(color[1], bins),
                bin_of(color[2], bins),
            ]] += 1.0;
            count += 1;
        }

        if count == 0 {
            return ColorDistribution::unknown(bins);
        }

        if self.kernel.len() > 1 {
            for axis in 0..3 {
                smooth_axis(&mut table, Axis(axis), &self.kernel);
            }
        }

        let total = table.sum();
        table /= total;

        tracing::debug!(
            "Estimated density from {} samples over {}^3 bins",
            count,
            bins
        );

        ColorDistribution::Estimated { table }
    }
}

#[inline]
fn bin_of(value: u8, bins: usize) -> usize {
    value as usize * bins / 256
}

/// Normalized Gaussian taps covering +/- 3 standard deviations, at most
/// `max_radius` taps either side of the centre
fn gaussian_kernel(sigma: f64, max_radius: usize) -> Vec<f64> {
    if sigma <= 0.0 || max_radius == 0 {
        return vec![1.0];
    }
    // taps past the table edge only ever multiply zero padding
    let radius = (3.0 * sigma).ceil().min(max_radius as f64) as isize;
    let taps: Vec<f64> = (-radius..=radius)
        .map(|offset| {
            let offset = offset as f64;
            (-(offset * offset) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|tap| tap / sum).collect()
}

/// Convolve every lane along `axis` with `kernel`, zero outside the table
fn smooth_axis(table: &mut Array3<f64>, axis: Axis, kernel: &[f64]) {
    let radius = (kernel.len() / 2) as isize;
    let mut scratch = vec![0.0; table.len_of(axis)];

    for mut lane in table.lanes_mut(axis) {
        let len = lane.len() as isize;
        for (i, out) in scratch.iter_mut().enumerate() {
            let mut acc = 0.0;
            for (k, &weight) in kernel.iter().enumerate() {
                let j = i as isize + k as isize - radius;
                if (0..len).contains(&j) {
                    acc += weight * lane[j as usize];
                }
            }
            *out = acc;
        }
        for (dst, &src) in lane.iter_mut().zip(&scratch) {
            *dst = src;
        }
    }
}
