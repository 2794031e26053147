//! One-frame dehaze pipeline.
//!
//! The pipeline holds no state between calls; concurrent frames only need
//! their own input arrays.

use std::time::Instant;

use ndarray::{Array2, Array3, ArrayView3};
use tracing::{debug, debug_span};

use super::atmospheric::{estimate_ambient_light, AmbientLight};
use super::color_dims;
use super::dark_channel::dark_channel;
use super::guided::refine_transmission;
use super::params::DehazeParams;
use super::radiance::recover_radiance;
use super::transmission::estimate_transmission;
use crate::errors::Result;
use crate::filters::integral::Region;

/// Every intermediate of a pipeline run, for debug views.
#[derive(Debug, Clone)]
pub struct DehazeOutput {
    pub dark_channel: Array2<f32>,
    pub bright_region: Region,
    pub ambient_light: AmbientLight,
    /// Transmission before refinement and before the floor is applied.
    pub raw_transmission: Array2<f32>,
    /// Present only when refinement is enabled.
    pub refined_transmission: Option<Array2<f32>>,
    pub recovered: Array3<f32>,
}

impl DehazeOutput {
    /// The transmission map that was used for recovery.
    pub fn transmission(&self) -> &Array2<f32> {
        self.refined_transmission.as_ref().unwrap_or(&self.raw_transmission)
    }
}

/// Run all stages and keep the intermediates.
///
/// # Arguments
/// * `input` - Hazy image with 3 or 4 channels (height, width, channels), values >= 0
/// * `params` - Pipeline parameters, validated before any work is done
pub fn dehaze_detailed(input: ArrayView3<f32>, params: &DehazeParams) -> Result<DehazeOutput> {
    params.validate()?;
    let (height, width) = color_dims(&input)?;

    let span = debug_span!("dehaze", width, height);
    let _enter = span.enter();
    let start = Instant::now();

    let dark = dark_channel(input, params.patch_size)?;
    let (bright_region, ambient_light) =
        estimate_ambient_light(input, dark.view(), params.search_depth)?;
    let raw_transmission =
        estimate_transmission(input, &ambient_light, params.patch_size, params.omega)?;
    debug!(elapsed_ms = start.elapsed().as_secs_f64() * 1e3, "transmission estimated");

    let refined_transmission = if params.refine {
        let refined = refine_transmission(
            input,
            raw_transmission.view(),
            params.guided_radius,
            params.guided_eps,
        )?;
        debug!(elapsed_ms = start.elapsed().as_secs_f64() * 1e3, "transmission refined");
        Some(refined)
    } else {
        None
    };

    let transmission = refined_transmission.as_ref().unwrap_or(&raw_transmission);
    let recovered = recover_radiance(
        input,
        transmission.view(),
        &ambient_light,
        params.min_transmission,
    )?;
    debug!(elapsed_ms = start.elapsed().as_secs_f64() * 1e3, "frame done");

    Ok(DehazeOutput {
        dark_channel: dark,
        bright_region,
        ambient_light,
        raw_transmission,
        refined_transmission,
        recovered,
    })
}

/// Remove haze from one frame.
///
/// Output values are unclamped; see [`super::radiance::clamp_unit`].
pub fn dehaze(input: ArrayView3<f32>, params: &DehazeParams) -> Result<Array3<f32>> {
    dehaze_detailed(input, params).map(|output| output.recovered)
}
