//! Raw transmission estimate: `t = 1 - omega * dark(I / A)`.

use ndarray::{Array2, Array3, ArrayView3};
use tracing::debug;

use super::atmospheric::AmbientLight;
use super::color_dims;
use super::dark_channel::dark_channel;
use super::params::validate_omega;
use crate::errors::Result;

/// Estimate transmission from the image normalized by the ambient light.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels)
/// * `ambient` - Ambient light; components are positive by construction
/// * `patch_size` - Dark channel patch side, same as for the first dark channel
/// * `omega` - Fraction of haze to remove, (0, 1]
///
/// # Returns
/// Unclamped (height, width) transmission, nominally in `[1 - omega, 1]`
pub fn estimate_transmission(
    input: ArrayView3<f32>,
    ambient: &AmbientLight,
    patch_size: usize,
    omega: f32,
) -> Result<Array2<f32>> {
    validate_omega(omega)?;
    let (height, width) = color_dims(&input)?;
    debug!(width, height, patch_size, omega, "transmission estimate");

    let inv = ambient.reciprocal();
    let normalized = Array3::from_shape_fn((height, width, 3), |(y, x, c)| input[[y, x, c]] * inv[c]);

    let mut transmission = dark_channel(normalized.view(), patch_size)?;
    transmission.mapv_inplace(|d| 1.0 - omega * d);
    Ok(transmission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dehaze::params::DEFAULT_OMEGA;
    use ndarray::Array3;

    #[test]
    fn test_uniform_image_equal_to_ambient() {
        let img = Array3::<f32>::from_elem((4, 4, 3), 0.5);
        let ambient = AmbientLight::new(0.5, 0.5, 0.5).unwrap();

        let t = estimate_transmission(img.view(), &ambient, 15, DEFAULT_OMEGA).unwrap();

        for v in t.iter() {
            assert!((v - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn test_black_image_fully_transmits() {
        let img = Array3::<f32>::zeros((3, 5, 3));
        let ambient = AmbientLight::new(0.9, 0.8, 0.7).unwrap();

        let t = estimate_transmission(img.view(), &ambient, 3, 0.95).unwrap();
        for v in t.iter() {
            assert_eq!(*v, 1.0);
        }
    }

    #[test]
    fn test_normalization_per_channel() {
        // Channel 2 is darkest in absolute terms but brightest relative to A
        let mut img = Array3::<f32>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 0.4;
        img[[0, 0, 1]] = 0.6;
        img[[0, 0, 2]] = 0.2;
        let ambient = AmbientLight::new(0.8, 0.8, 0.2).unwrap();

        let t = estimate_transmission(img.view(), &ambient, 1, 1.0).unwrap();
        // min(0.5, 0.75, 1.0) = 0.5
        assert!((t[[0, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_omega() {
        let img = Array3::<f32>::zeros((2, 2, 3));
        let ambient = AmbientLight::new(0.5, 0.5, 0.5).unwrap();
        assert!(estimate_transmission(img.view(), &ambient, 3, 0.0).is_err());
    }
}
