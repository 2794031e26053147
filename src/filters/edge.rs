//! Sobel edge map, used as a debug view next to the dehazed frame.
//!
//! The input is smoothed with a 3x3 Gaussian, converted to BT.601 luma, and
//! the absolute horizontal and vertical Sobel responses are averaged. Each
//! response saturates at 1.0 before averaging, as an 8-bit `|g|` would at 255.
//!
//! Border pixels replicate the nearest edge pixel.

use ndarray::{Array2, ArrayView2, ArrayView3};

use super::grayscale::{luminance, GrayscaleWeights};

/// Separable 3x3 Gaussian (sigma derived from the kernel size)
const GAUSS_3: [f32; 3] = [0.25, 0.5, 0.25];

const KERNEL_H: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const KERNEL_V: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

#[inline]
fn clamped(v: usize, delta: isize, len: usize) -> usize {
    (v as isize + delta).clamp(0, len as isize - 1) as usize
}

fn gaussian_3x3(input: ArrayView2<f32>) -> Array2<f32> {
    let (height, width) = input.dim();
    let mut temp = Array2::<f32>::zeros((height, width));
    let mut result = Array2::<f32>::zeros((height, width));

    // Horizontal pass
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (ki, &kv) in GAUSS_3.iter().enumerate() {
                sum += input[[y, clamped(x, ki as isize - 1, width)]] * kv;
            }
            temp[[y, x]] = sum;
        }
    }

    // Vertical pass
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (ki, &kv) in GAUSS_3.iter().enumerate() {
                sum += temp[[clamped(y, ki as isize - 1, height), x]] * kv;
            }
            result[[y, x]] = sum;
        }
    }

    result
}

/// Edge magnitude map of an RGB or RGBA image.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels (height, width, channels), values 0.0-1.0
///
/// # Returns
/// Single-channel (height, width) map, values 0.0-1.0
///
/// # Panics
/// If `input` has fewer than 3 channels
pub fn sobel_edges(input: ArrayView3<f32>) -> Array2<f32> {
    let (height, width, _) = input.dim();
    let gray = luminance(input, GrayscaleWeights::bt601());
    let smooth = gaussian_3x3(gray.view());

    let mut output = Array2::<f32>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let mut gx = 0.0f32;
            let mut gy = 0.0f32;

            for ky in 0..3 {
                let py = clamped(y, ky as isize - 1, height);
                for kx in 0..3 {
                    let px = clamped(x, kx as isize - 1, width);
                    let lum = smooth[[py, px]];
                    gx += lum * KERNEL_H[ky][kx];
                    gy += lum * KERNEL_V[ky][kx];
                }
            }

            output[[y, x]] = 0.5 * gx.abs().min(1.0) + 0.5 * gy.abs().min(1.0);
        }
    }

    output
}
