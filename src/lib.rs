//! # matting
//!
//! Interactive foreground/background separation of a still image from user
//! scribbles.
//!
//! The engine takes an image already converted to a perceptually uniform
//! 3-channel color space (8-bit Lab) and an ordered series of scribbles, each
//! marking a set of pixels as foreground or background. For every class it
//! keeps:
//!
//! - **Color density**: a smoothed histogram of the colors under its scribbles
//! - **Evidence distance**: the geodesic distance to its nearest scribble over
//!   the pixel grid, where crossing a color edge is expensive
//! - **Likelihood**: density and distance merged per pixel
//!
//! The binary mask marks a pixel foreground when its foreground likelihood is
//! strictly greater than its background likelihood.
//!
//! ## Example Usage
//!
//! ```
//! use matting::{Matter, Scribble};
//!
//! # fn example() -> matting::Result<()> {
//! let (width, height) = (4, 4);
//! let plane = vec![128u8; 16];
//! let mut matter = Matter::new(&plane, &plane, &plane, width, height)?;
//!
//! matter.add_scribble(&Scribble::foreground([(0, 0)]))?;
//! matter.add_scribble(&Scribble::background([(3, 3)]))?;
//!
//! let mut mask = vec![0u8; 16];
//! matter.foreground_mask(&mut mask)?;
//! assert_eq!(mask[0], 255);
//! assert_eq!(mask[15], 0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod config;
mod engine;
mod error;

pub use config::{Connectivity, MattingConfig};
pub use engine::{
    color_distance, decide, invert, Appended, ColorDistribution, DensityEstimator, EvidenceField,
    Label, LabImage, LikelihoodCombiner, Matter, Point, Propagator, Scribble, ScribbleLog,
    ScribbleState, BACKGROUND, FOREGROUND, MIN_LIKELIHOOD,
};
pub use error::{MattingError, Result};
