use rayon::prelude::*;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Per-pixel decision between the two likelihood fields
///
/// A pixel is foreground only when its foreground likelihood is strictly
/// greater; ties, including the all-minimum state before any scribble, go to
/// background. No smoothing is applied.
pub fn decide(foreground: &[f64], background: &[f64], mask: &mut [u8]) {
    debug_assert_eq!(foreground.len(), mask.len());
    debug_assert_eq!(background.len(), mask.len());

    mask.par_iter_mut()
        .zip(foreground.par_iter().zip(background.par_iter()))
        .for_each(|(out, (&fg, &bg))| {
            *out = if fg > bg { FOREGROUND } else { BACKGROUND };
        });
}

/// Swap foreground and background in a mask
pub fn invert(mask: &mut [u8]) {
    mask.par_iter_mut()
        .for_each(|value| *value = FOREGROUND - *value);
}
