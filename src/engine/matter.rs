use std::sync::OnceLock;

use super::distribution::{ColorDistribution, DensityEstimator};
use super::image::LabImage;
use super::likelihood::{LikelihoodCombiner, MIN_LIKELIHOOD};
use super::mask;
use super::propagation::{EvidenceField, Propagator};
use super::scribble::{Label, Scribble, ScribbleLog, ScribbleState};
use crate::config::MattingConfig;
use crate::error::{MattingError, Result};

/// Derived state kept for one class
#[derive(Debug, Clone)]
struct ClassModel {
    distribution: ColorDistribution,
    field: EvidenceField,
    likelihood: Vec<f64>,
}

impl ClassModel {
    fn new(len: usize, bins: usize) -> Self {
        Self {
            distribution: ColorDistribution::unknown(bins),
            field: EvidenceField::unreached(len),
            likelihood: vec![MIN_LIKELIHOOD; len],
        }
    }
}

/// Current state of an interactive matting session
///
/// Owns a copy of the image, the scribble history and every field derived
/// from it. `add_scribble` needs exclusive access; all accessors take `&self`
/// and can be called from several threads at once.
///
/// Scribble order matters: each scribble refines the evidence left by the
/// previous ones instead of recomputing it, so a late local correction only
/// changes the region it is closest to.
#[derive(Debug)]
pub struct Matter {
    image: LabImage,
    log: ScribbleLog,
    state: ScribbleState,
    estimator: DensityEstimator,
    propagator: Propagator,
    combiner: LikelihoodCombiner,
    foreground: ClassModel,
    background: ClassModel,
    mask: OnceLock<Vec<u8>>,
}

impl Matter {
    /// Start a session on an image given as three row-major Lab planes
    ///
    /// # Arguments
    /// * `l`, `a`, `b` - Channel planes of `width * height` samples each; copied
    /// * `width`, `height` - Image dimensions, both non-zero
    pub fn new(l: &[u8], a: &[u8], b: &[u8], width: u32, height: u32) -> Result<Self> {
        Self::with_config(l, a, b, width, height, MattingConfig::default())
    }

    pub fn with_config(
        l: &[u8],
        a: &[u8],
        b: &[u8],
        width: u32,
        height: u32,
        config: MattingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let image = LabImage::from_planes(l, a, b, width, height)?;
        let len = image.len();

        tracing::debug!("New matting session on a {}x{} image", width, height);

        Ok(Self {
            estimator: DensityEstimator::new(config.bins, config.bandwidth),
            propagator: Propagator::new(&config),
            combiner: LikelihoodCombiner::new(&config),
            foreground: ClassModel::new(len, config.bins),
            background: ClassModel::new(len, config.bins),
            log: ScribbleLog::new(width, height),
            state: ScribbleState::Empty,
            mask: OnceLock::new(),
            image,
        })
    }

    /// Apply a scribble and refresh every derived field
    ///
    /// An empty scribble is ignored. A scribble with any point outside the
    /// image is rejected as a whole and leaves the session unchanged.
    pub fn add_scribble(&mut self, scribble: &Scribble) -> Result<()> {
        let _span = tracing::debug_span!("add_scribble", label = ?scribble.label).entered();

        let Some(appended) = self.log.append(scribble)? else {
            tracing::debug!("Ignoring empty scribble");
            return Ok(());
        };

        let first_of_label = !self.state.has(appended.label);
        self.state = self.state.advance(appended.label);
        tracing::debug!(
            "Scribble {} ({:?}) claims {} pixels, {} taken from the other class, first of its class: {}",
            appended.index,
            appended.label,
            appended.claimed.len(),
            appended.displaced,
            first_of_label
        );

        self.rebuild_distribution(appended.label);
        if appended.displaced > 0 {
            self.rebuild_distribution(appended.label.opposite());
        }

        let model = match appended.label {
            Label::Foreground => &mut self.foreground,
            Label::Background => &mut self.background,
        };
        self.propagator
            .reseed(&self.image, &mut model.field, &appended.claimed);

        self.recombine(Label::Foreground);
        self.recombine(Label::Background);
        self.mask = OnceLock::new();

        Ok(())
    }

    /// Number of non-empty scribbles accepted so far
    pub fn num_scribbles(&self) -> usize {
        self.log.len()
    }

    pub fn state(&self) -> ScribbleState {
        self.state
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fill `out` with the foreground mask: 255 foreground, 0 background
    pub fn foreground_mask(&self, out: &mut [u8]) -> Result<()> {
        copy_into(self.cached_mask(), out)
    }

    /// Fill `out` with the inverted mask: 255 background, 0 foreground
    pub fn background_mask(&self, out: &mut [u8]) -> Result<()> {
        copy_into(self.cached_mask(), out)?;
        mask::invert(out);
        Ok(())
    }

    pub fn foreground_likelihood(&self, out: &mut [f64]) -> Result<()> {
        copy_into(&self.foreground.likelihood, out)
    }

    pub fn background_likelihood(&self, out: &mut [f64]) -> Result<()> {
        copy_into(&self.background.likelihood, out)
    }

    /// Fill `out` with the foreground evidence distances; `+inf` where no
    /// foreground scribble is reachable yet
    pub fn foreground_dist(&self, out: &mut [f64]) -> Result<()> {
        copy_into(self.foreground.field.values(), out)
    }

    pub fn background_dist(&self, out: &mut [f64]) -> Result<()> {
        copy_into(self.background.field.values(), out)
    }

    /// Current color density of a class
    pub fn distribution(&self, label: Label) -> &ColorDistribution {
        &self.model(label).distribution
    }

    fn model(&self, label: Label) -> &ClassModel {
        match label {
            Label::Foreground => &self.foreground,
            Label::Background => &self.background,
        }
    }

    fn rebuild_distribution(&mut self, label: Label) {
        let image = &self.image;
        let distribution = self
            .estimator
            .estimate(self.log.owned_pixels(label).map(|pixel| image.color(pixel)));
        match label {
            Label::Foreground => self.foreground.distribution = distribution,
            Label::Background => self.background.distribution = distribution,
        }
    }

    fn recombine(&mut self, label: Label) {
        let model = match label {
            Label::Foreground => &mut self.foreground,
            Label::Background => &mut self.background,
        };
        self.combiner.recompute(
            label,
            self.state,
            &self.image,
            &self.log,
            &model.distribution,
            &model.field,
            &mut model.likelihood,
        );
    }

    fn cached_mask(&self) -> &[u8] {
        self.mask.get_or_init(|| {
            let _span = tracing::debug_span!("decide_mask").entered();
            let mut values = vec![mask::BACKGROUND; self.image.len()];
            mask::decide(
                &self.foreground.likelihood,
                &self.background.likelihood,
                &mut values,
            );
            values
        })
    }
}

fn copy_into<T: Copy>(source: &[T], out: &mut [T]) -> Result<()> {
    if out.len() != source.len() {
        return Err(MattingError::BufferSize {
            expected: source.len(),
            actual: out.len(),
        });
    }
    out.copy_from_slice(source);
    Ok(())
}
