//! Dark channel: per-pixel channel minimum eroded over a square patch.
//!
//! The erosion is anchored at the top-left corner of the patch (see
//! [`erode_anchored`]), which shifts the result by `size / 2` pixels compared
//! to a centred patch. Output of earlier versions depends on that placement.

use ndarray::{Array2, ArrayView3};
use tracing::debug;

use super::color_dims;
use super::params::validate_patch_size;
use crate::errors::Result;
use crate::filters::morphology::{erode_anchored, min_channel};

/// Compute the dark channel of an RGB or RGBA image.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `size` - Patch side, odd and >= 1; 1 skips the erosion
///
/// # Returns
/// Single-channel (height, width) dark channel
pub fn dark_channel(input: ArrayView3<f32>, size: usize) -> Result<Array2<f32>> {
    validate_patch_size(size)?;
    let (height, width) = color_dims(&input)?;
    debug!(width, height, size, "dark channel");

    let dark = min_channel(input);
    if size == 1 {
        return Ok(dark);
    }
    Ok(erode_anchored(dark.view(), size))
}
