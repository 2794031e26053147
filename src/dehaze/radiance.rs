//! Scene radiance recovery: `J = (I - A) / max(t, t0) + A`.
//!
//! The floor `t0` is applied to the transmission before the division, which
//! bounds the amplification of `I - A` by `1 / t0`. Output is not clamped;
//! recovered values may leave [0, 1] and [`clamp_unit`] is provided for the
//! display side.

use ndarray::{Array3, ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;
use tracing::debug;

use super::atmospheric::AmbientLight;
use super::color_dims;
use super::params::validate_min_transmission;
use crate::errors::{ensure_same_shape, Result};

/// Invert the haze model per channel.
///
/// # Arguments
/// * `input` - Hazy image with 3 or 4 channels (height, width, channels)
/// * `transmission` - (height, width) transmission map
/// * `ambient` - Ambient light
/// * `min_transmission` - Floor for the transmission, (0, 1]
///
/// # Returns
/// Recovered image with the same channel count; alpha is copied unchanged
pub fn recover_radiance(
    input: ArrayView3<f32>,
    transmission: ArrayView2<f32>,
    ambient: &AmbientLight,
    min_transmission: f32,
) -> Result<Array3<f32>> {
    validate_min_transmission(min_transmission)?;
    let (height, width) = color_dims(&input)?;
    ensure_same_shape((height, width), transmission.dim())?;
    debug!(width, height, min_transmission, "radiance recovery");

    let channels = input.dim().2;
    let airlight = ambient.rgb();
    let mut output = Array3::<f32>::zeros((height, width, channels));

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                let t = transmission[[y, x]].max(min_transmission);
                for (c, &a) in airlight.iter().enumerate() {
                    row[[x, c]] = (input[[y, x, c]] - a) / t + a;
                }
                if channels == 4 {
                    row[[x, 3]] = input[[y, x, 3]];
                }
            }
        });

    Ok(output)
}

/// Clamp every value to [0, 1] for conversion to a display format.
pub fn clamp_unit(input: ArrayView3<f32>) -> Array3<f32> {
    input.mapv(|v| v.clamp(0.0, 1.0))
}
