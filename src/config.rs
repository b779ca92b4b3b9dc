use crate::error::{MattingError, Result};

/// Pixel adjacency used by evidence propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Horizontal and vertical neighbours
    #[default]
    Four,
    /// Horizontal, vertical and diagonal neighbours
    Eight,
}

/// Tuning knobs of the matting engine
///
/// # Default Configuration
/// - 4-neighbour propagation
/// - 32 histogram bins per channel, Gaussian bandwidth of 1 bin
/// - Edge weight: 1.0 per unit step plus 1.0 per unit of color distance
/// - Distance scale 16.0, density prior 1e-6
#[derive(Debug, Clone, PartialEq)]
pub struct MattingConfig {
    pub connectivity: Connectivity,

    /// Histogram bins per color channel
    pub bins: usize,

    /// Standard deviation of the density smoothing kernel, in bins.
    /// Zero keeps the raw histogram.
    pub bandwidth: f64,

    /// Cost of one axial step between neighbouring pixels
    pub step_cost: f64,

    /// Multiplier applied to the color distance between neighbouring pixels
    pub color_weight: f64,

    /// Evidence distance at which likelihood drops by a factor of e
    pub distance_scale: f64,

    /// Added to the color density so likelihood keeps depending on distance
    /// for colors the class has never seen
    pub density_prior: f64,
}

impl Default for MattingConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Four,
            bins: 32,
            bandwidth: 1.0,
            step_cost: 1.0,
            color_weight: 1.0,
            distance_scale: 16.0,
            density_prior: 1e-6,
        }
    }
}

impl MattingConfig {
    /// Check that every knob lies in its valid range
    pub fn validate(&self) -> Result<()> {
        if !(2..=256).contains(&self.bins) {
            return Err(invalid(format!("bins must be in 2..=256, got {}", self.bins)));
        }
        if !self.bandwidth.is_finite() || self.bandwidth < 0.0 {
            return Err(invalid(format!(
                "bandwidth must be finite and non-negative, got {}",
                self.bandwidth
            )));
        }
        if !self.step_cost.is_finite() || self.step_cost <= 0.0 {
            return Err(invalid(format!(
                "step_cost must be finite and positive, got {}",
                self.step_cost
            )));
        }
        if !self.color_weight.is_finite() || self.color_weight <= 0.0 {
            return Err(invalid(format!(
                "color_weight must be finite and positive, got {}",
                self.color_weight
            )));
        }
        if !self.distance_scale.is_finite() || self.distance_scale <= 0.0 {
            return Err(invalid(format!(
                "distance_scale must be finite and positive, got {}",
                self.distance_scale
            )));
        }
        if !self.density_prior.is_finite() || self.density_prior <= 0.0 {
            return Err(invalid(format!(
                "density_prior must be finite and positive, got {}",
                self.density_prior
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> MattingError {
    MattingError::InvalidConfig(message)
}
