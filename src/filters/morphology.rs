//! Morphology primitives used by the dark channel: per-pixel channel minimum
//! and rectangular erosion.
//!
//! ## Anchor
//!
//! [`erode_anchored`] places the anchor on the top-left corner of the
//! structuring element: output `[y, x]` is the minimum over rows
//! `y..y + size` and columns `x..x + size`, clipped to the image. Compared to
//! a centred erosion the result is shifted by `size / 2` pixels towards the
//! top-left. Out-of-bounds pixels are ignored rather than treated as black.
//!
//! ## Performance
//!
//! A rectangular minimum is separable, so erosion runs as a horizontal pass
//! followed by a vertical pass: O(n x 2 size) instead of O(n x size²).
//! Both passes are parallelized over rows with Rayon.

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;

// ============================================================================
// Channel minimum
// ============================================================================

/// Minimum of the R, G and B channels of each pixel.
///
/// A fourth (alpha) channel, if present, is ignored.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
///
/// # Returns
/// Single-channel (height, width) map
///
/// # Panics
/// If `input` has fewer than 3 channels
pub fn min_channel(input: ArrayView3<f32>) -> Array2<f32> {
    let (height, width, channels) = input.dim();
    assert!(channels >= 3, "min_channel needs at least 3 channels, got {}", channels);
    let mut output = Array2::<f32>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let r = input[[y, x, 0]];
            let g = input[[y, x, 1]];
            let b = input[[y, x, 2]];
            output[[y, x]] = r.min(g).min(b);
        }
    }

    output
}

// ============================================================================
// Erode
// ============================================================================

/// Erode a single-channel map with a `size` x `size` square anchored at its
/// top-left corner.
///
/// `size` of 0 or 1 returns a copy.
pub fn erode_anchored(input: ArrayView2<f32>, size: usize) -> Array2<f32> {
    if size <= 1 {
        return input.to_owned();
    }

    let (height, width) = input.dim();
    let mut temp = Array2::<f32>::zeros((height, width));
    let mut output = Array2::<f32>::zeros((height, width));

    // Horizontal pass
    temp.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                let end = (x + size).min(width);
                let mut min_val = f32::INFINITY;
                for sx in x..end {
                    min_val = min_val.min(input[[y, sx]]);
                }
                row[x] = min_val;
            }
        });

    // Vertical pass
    let temp = temp.view();
    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let end = (y + size).min(height);
            for x in 0..width {
                let mut min_val = f32::INFINITY;
                for sy in y..end {
                    min_val = min_val.min(temp[[sy, x]]);
                }
                row[x] = min_val;
            }
        });

    output
}
