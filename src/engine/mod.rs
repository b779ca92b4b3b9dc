mod distribution;
mod image;
mod likelihood;
mod mask;
mod matter;
mod propagation;
mod scribble;

pub use distribution::{ColorDistribution, DensityEstimator};
pub use image::{color_distance, LabImage};
pub use likelihood::{LikelihoodCombiner, MIN_LIKELIHOOD};
pub use mask::{decide, invert, BACKGROUND, FOREGROUND};
pub use matter::Matter;
pub use propagation::{EvidenceField, Propagator};
pub use scribble::{Appended, Label, Point, Scribble, ScribbleLog, ScribbleState};
