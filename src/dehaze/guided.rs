//! Guided filter refinement of the transmission map.
//!
//! Within every window the estimate is modelled as `a * guide + b`, with
//! `a = cov(guide, estimate) / (var(guide) + eps)` and
//! `b = mean(estimate) - a * mean(guide)`. The coefficients are averaged
//! over all windows covering a pixel before being applied, which removes the
//! blocky patch edges left by the dark channel while following edges in the
//! guide.
//!
//! All six local means go through [`box_mean`] with the same radius, so
//! border handling is the same in every pass.

use ndarray::{Array2, ArrayView2, ArrayView3};
use tracing::debug;

use super::color_dims;
use super::params::validate_guided;
use crate::errors::{ensure_same_shape, Result};
use crate::filters::grayscale::{luminance, GrayscaleWeights};
use crate::filters::integral::box_mean;

/// Edge-aware smoothing of `estimate` steered by `guide`.
///
/// # Arguments
/// * `guide` - Single-channel guidance image
/// * `estimate` - Map to filter, same shape as `guide`
/// * `radius` - Window radius (window side is `2 * radius + 1`), >= 1
/// * `eps` - Regularization, > 0; larger values smooth more
pub fn guided_filter(
    guide: ArrayView2<f32>,
    estimate: ArrayView2<f32>,
    radius: usize,
    eps: f32,
) -> Result<Array2<f32>> {
    validate_guided(radius, eps)?;
    ensure_same_shape(guide.dim(), estimate.dim())?;

    let mean_guide = box_mean(guide, radius);
    let mean_estimate = box_mean(estimate, radius);
    let mean_guide_estimate = box_mean((&guide * &estimate).view(), radius);
    let mean_guide_sq = box_mean((&guide * &guide).view(), radius);

    let covariance = &mean_guide_estimate - &(&mean_guide * &mean_estimate);
    // Cancellation can leave tiny negative variances in flat areas
    let variance = (&mean_guide_sq - &(&mean_guide * &mean_guide)).mapv(|v| v.max(0.0));

    let a = &covariance / &(variance + eps);
    let b = &mean_estimate - &(&a * &mean_guide);

    let mean_a = box_mean(a.view(), radius);
    let mean_b = box_mean(b.view(), radius);

    Ok(&mean_a * &guide + &mean_b)
}

/// Refine a raw transmission map against the luma of `input`.
pub fn refine_transmission(
    input: ArrayView3<f32>,
    estimate: ArrayView2<f32>,
    radius: usize,
    eps: f32,
) -> Result<Array2<f32>> {
    let (height, width) = color_dims(&input)?;
    ensure_same_shape((height, width), estimate.dim())?;
    debug!(width, height, radius, eps, "guided refinement");

    let guide = luminance(input, GrayscaleWeights::bt601());
    guided_filter(guide.view(), estimate, radius, eps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DehazeError;
    use ndarray::{Array2, Array3};

    fn noisy(height: usize, width: usize) -> Array2<f32> {
        Array2::from_shape_fn((height, width), |(y, x)| ((y * 37 + x * 11) % 13) as f32 / 12.0)
    }

    /// Mean of `f(y, x)` over the clipped window of `radius` around `(cy, cx)`.
    fn window_mean(
        (height, width): (usize, usize),
        (cy, cx): (usize, usize),
        radius: usize,
        f: impl Fn(usize, usize) -> f64,
    ) -> f64 {
        let mut sum = 0.0;
        let mut count = 0.0;
        for y in cy.saturating_sub(radius)..(cy + radius + 1).min(height) {
            for x in cx.saturating_sub(radius)..(cx + radius + 1).min(width) {
                sum += f(y, x);
                count += 1.0;
            }
        }
        sum / count
    }

    #[test]
    fn test_matches_windowed_regression() {
        let (height, width) = (5, 5);
        let radius = 1;
        let eps = 1e-2f64;
        let guide = noisy(height, width);
        let estimate = Array2::from_shape_fn((height, width), |(y, x)| {
            0.2 + 0.1 * y as f32 + 0.05 * ((x * 7 + y) % 4) as f32
        });
        let g = |y: usize, x: usize| guide[[y, x]] as f64;
        let p = |y: usize, x: usize| estimate[[y, x]] as f64;
        let dim = (height, width);

        // Per-window linear coefficients
        let mut a = Array2::<f64>::zeros(dim);
        let mut b = Array2::<f64>::zeros(dim);
        for y in 0..height {
            for x in 0..width {
                let mean_g = window_mean(dim, (y, x), radius, g);
                let mean_p = window_mean(dim, (y, x), radius, p);
                let mean_gp = window_mean(dim, (y, x), radius, |yy, xx| g(yy, xx) * p(yy, xx));
                let mean_gg = window_mean(dim, (y, x), radius, |yy, xx| g(yy, xx) * g(yy, xx));
                let var = (mean_gg - mean_g * mean_g).max(0.0);
                a[[y, x]] = (mean_gp - mean_g * mean_p) / (var + eps);
                b[[y, x]] = mean_p - a[[y, x]] * mean_g;
            }
        }

        let result = guided_filter(guide.view(), estimate.view(), radius, eps as f32).unwrap();
        for y in 0..height {
            for x in 0..width {
                let mean_a = window_mean(dim, (y, x), radius, |yy, xx| a[[yy, xx]]);
                let mean_b = window_mean(dim, (y, x), radius, |yy, xx| b[[yy, xx]]);
                let expected = mean_a * g(y, x) + mean_b;
                assert!(
                    (result[[y, x]] as f64 - expected).abs() < 1e-3,
                    "({}, {}): {} vs {}",
                    y,
                    x,
                    result[[y, x]],
                    expected
                );
            }
        }
    }

    #[test]
    fn test_constant_estimate_is_preserved() {
        let guide = noisy(10, 12);
        let estimate = Array2::<f32>::from_elem((10, 12), 0.6);

        let result = guided_filter(guide.view(), estimate.view(), 3, 1e-4).unwrap();
        for v in result.iter() {
            assert!((v - 0.6).abs() < 1e-4);
        }
    }

    #[test]
    fn test_large_eps_tends_to_box_average() {
        let guide = noisy(9, 11);
        let estimate = Array2::from_shape_fn((9, 11), |(y, x)| (y + x) as f32 / 20.0);
        let radius = 2;

        let result = guided_filter(guide.view(), estimate.view(), radius, 1e9).unwrap();

        // With a -> 0, b is the local mean and gets averaged once more
        let expected = box_mean(box_mean(estimate.view(), radius).view(), radius);
        for (r, e) in result.iter().zip(expected.iter()) {
            assert!((r - e).abs() < 1e-4);
        }
    }

    #[test]
    fn test_follows_guide_edge() {
        // Guide has a sharp vertical edge; estimate is a smeared version of it
        let guide = Array2::from_shape_fn((16, 16), |(_, x)| if x < 8 { 0.0 } else { 1.0 });
        let estimate = Array2::from_shape_fn((16, 16), |(_, x)| (x as f32 / 15.0).clamp(0.0, 1.0));

        let result = guided_filter(guide.view(), estimate.view(), 2, 1e-4).unwrap();

        // The jump across the edge is sharper than in the estimate
        let jump_in = estimate[[8, 8]] - estimate[[8, 7]];
        let jump_out = result[[8, 8]] - result[[8, 7]];
        assert!(jump_out > jump_in);
    }

    #[test]
    fn test_guide_equal_to_estimate_small_eps_is_near_identity() {
        let img = noisy(12, 12);
        let result = guided_filter(img.view(), img.view(), 2, 1e-6).unwrap();

        for (r, e) in result.iter().zip(img.iter()) {
            assert!((r - e).abs() < 1e-2);
        }
    }

    #[test]
    fn test_rejects_invalid_arguments() {
        let a = Array2::<f32>::zeros((4, 4));
        let b = Array2::<f32>::zeros((4, 5));

        assert!(matches!(
            guided_filter(a.view(), b.view(), 2, 1e-4),
            Err(DehazeError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            guided_filter(a.view(), a.view(), 0, 1e-4),
            Err(DehazeError::InvalidParameter { name: "guided_radius", .. })
        ));
        assert!(matches!(
            guided_filter(a.view(), a.view(), 2, 0.0),
            Err(DehazeError::InvalidParameter { name: "guided_eps", .. })
        ));
    }

    #[test]
    fn test_refine_uses_rgb_guide() {
        let img = Array3::<f32>::from_elem((6, 6, 3), 0.5);
        let estimate = Array2::<f32>::from_elem((6, 6), 0.3);

        let result = refine_transmission(img.view(), estimate.view(), 2, 1e-4).unwrap();
        assert_eq!(result.dim(), (6, 6));
        for v in result.iter() {
            assert!((v - 0.3).abs() < 1e-4);
        }

        let wrong = Array2::<f32>::zeros((5, 6));
        assert!(refine_transmission(img.view(), wrong.view(), 2, 1e-4).is_err());
    }
}
