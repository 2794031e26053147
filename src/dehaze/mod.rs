//! Dark-channel-prior haze removal.
//!
//! Stages, in call order:
//!
//! 1. [`dark_channel`] - channel minimum followed by erosion
//! 2. [`atmospheric`] - quadrant search over the dark channel for the ambient light
//! 3. [`transmission`] - raw transmission from the ambient-normalized image
//! 4. [`guided`] - optional edge-aware refinement of the transmission
//! 5. [`radiance`] - inversion of the haze model
//!
//! Every stage is a pure function of borrowed inputs and returns a fresh
//! array; [`pipeline`] chains them for one frame.

pub mod params;
pub mod dark_channel;
pub mod atmospheric;
pub mod transmission;
pub mod guided;
pub mod radiance;
pub mod pipeline;

use ndarray::ArrayView3;

use crate::errors::{DehazeError, Result};

pub use atmospheric::AmbientLight;
pub use params::DehazeParams;
pub use pipeline::{dehaze, dehaze_detailed, DehazeOutput};

/// `(height, width)` of a color image, after checking it has 3 or 4 channels
/// and at least one pixel.
pub(crate) fn color_dims(image: &ArrayView3<f32>) -> Result<(usize, usize)> {
    let (height, width, channels) = image.dim();
    if channels != 3 && channels != 4 {
        return Err(DehazeError::UnsupportedChannels(channels));
    }
    if height == 0 || width == 0 {
        return Err(DehazeError::EmptyImage);
    }
    Ok((height, width))
}
