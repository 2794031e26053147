//! Luminance extraction and bit-depth conversion.
//!
//! The guided filter needs a single-channel guide; [`luminance`] produces it
//! from RGB or RGBA input with configurable channel weights.
//!
//! ## Bit Depth Support
//!
//! - **u8 (8-bit)**: Values 0-255, as delivered by camera and display buffers
//! - **f32 (float)**: Values 0.0-1.0, used by every dehaze stage
//!
//! [`u8_to_f32`] and [`f32_to_u8`] are the conversions applied at the
//! acquisition and display boundaries.

use ndarray::{Array2, Array3, ArrayView3};

/// ITU-R BT.601 luma coefficients (the usual RGB to gray conversion)
pub const LUMA_601: [f32; 3] = [0.299, 0.587, 0.114];

/// ITU-R BT.709 luminosity coefficients
pub const LUMA_709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// RGB channel weights for grayscale conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayscaleWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for GrayscaleWeights {
    fn default() -> Self {
        Self::bt601()
    }
}

impl GrayscaleWeights {
    /// BT.601 luma (default)
    pub fn bt601() -> Self {
        Self { r: LUMA_601[0], g: LUMA_601[1], b: LUMA_601[2] }
    }

    /// BT.709 luminosity
    pub fn bt709() -> Self {
        Self { r: LUMA_709[0], g: LUMA_709[1], b: LUMA_709[2] }
    }

    /// Create custom weights (normalized automatically)
    pub fn custom(r: f32, g: f32, b: f32) -> Self {
        let sum = (r + g + b).abs().max(0.001);
        Self {
            r: r / sum,
            g: g / sum,
            b: b / sum,
        }
    }
}

/// Weighted sum of the color channels of each pixel.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels); alpha is ignored
/// * `weights` - Channel weights
///
/// # Returns
/// Single-channel (height, width) luminance map
///
/// # Panics
/// If `input` has fewer than 3 channels
pub fn luminance(input: ArrayView3<f32>, weights: GrayscaleWeights) -> Array2<f32> {
    let (height, width, channels) = input.dim();
    assert!(channels >= 3, "luminance needs at least 3 channels, got {}", channels);
    let mut output = Array2::<f32>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let r = input[[y, x, 0]];
            let g = input[[y, x, 1]];
            let b = input[[y, x, 2]];
            output[[y, x]] = weights.r * r + weights.g * g + weights.b * b;
        }
    }

    output
}

// ============================================================================
// Conversion Utilities
// ============================================================================

/// Convert u8 image (0-255) to f32 (0.0-1.0)
pub fn u8_to_f32(input: ArrayView3<u8>) -> Array3<f32> {
    input.mapv(|v| v as f32 / 255.0)
}

/// Convert f32 image (0.0-1.0) to u8 (0-255), clamping out-of-range values
pub fn f32_to_u8(input: ArrayView3<f32>) -> Array3<u8> {
    input.mapv(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}
