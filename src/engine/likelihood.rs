use rayon::prelude::*;

use super::distribution::ColorDistribution;
use super::image::LabImage;
use super::propagation::EvidenceField;
use super::scribble::{Label, ScribbleLog, ScribbleState};
use crate::config::MattingConfig;

/// Lowest likelihood a pixel can have; used for classes without scribbles
pub const MIN_LIKELIHOOD: f64 = f64::NEG_INFINITY;

/// Merges color density and evidence distance into a per-pixel log-likelihood
///
/// `likelihood = ln(density + density_prior) - distance / distance_scale`
///
/// Strictly increasing in density and strictly decreasing in finite distance,
/// at any distance an `f64` can hold. Unreachable pixels get
/// [`MIN_LIKELIHOOD`].
#[derive(Debug, Clone, Copy)]
pub struct LikelihoodCombiner {
    distance_scale: f64,
    density_prior: f64,
}

impl LikelihoodCombiner {
    pub fn new(config: &MattingConfig) -> Self {
        Self {
            distance_scale: config.distance_scale,
            density_prior: config.density_prior,
        }
    }

    #[inline]
    pub fn combine(&self, density: f64, distance: f64) -> f64 {
        (density + self.density_prior).ln() - distance / self.distance_scale
    }

    /// Recompute the likelihood of `label` for every pixel into `out`
    ///
    /// A class that has never been scribbled (per `state`) is at
    /// [`MIN_LIKELIHOOD`] everywhere. A pixel owned by a scribble of the
    /// opposite label is pinned to [`MIN_LIKELIHOOD`], so the newest scribble
    /// covering a pixel decides it.
    #[allow(clippy::too_many_arguments)]
    pub fn recompute(
        &self,
        label: Label,
        state: ScribbleState,
        image: &LabImage,
        log: &ScribbleLog,
        distribution: &ColorDistribution,
        field: &EvidenceField,
        out: &mut [f64],
    ) {
        let _span = tracing::debug_span!("combine_likelihood", ?label).entered();

        if !state.has(label) {
            out.fill(MIN_LIKELIHOOD);
            return;
        }

        let opposite = label.opposite();
        out.par_iter_mut()
            .zip(image.pixels().par_iter())
            .zip(field.values().par_iter())
            .enumerate()
            .for_each(|(pixel, ((out, &color), &distance))| {
                *out = if log.owner_label(pixel) == Some(opposite) {
                    MIN_LIKELIHOOD
                } else {
                    self.combine(distribution.density(color), distance)
                };
            });
    }
}
