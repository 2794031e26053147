//! Ambient (atmospheric) light estimation.
//!
//! The haziest part of the frame is found by repeatedly splitting the current
//! region into four quadrants and descending into the one whose dark channel
//! sum is largest. With an integral image each step costs four O(1) queries,
//! so the search needs O(depth) lookups instead of a windowed scan. The mean
//! color of the original image over the final region is the ambient light.

use ndarray::{ArrayView2, ArrayView3};
use tracing::{debug, trace, warn};

use super::color_dims;
use super::params::validate_search_depth;
use crate::errors::{ensure_same_shape, DehazeError, Result};
use crate::filters::integral::{IntegralImage, Region};

/// Lower bound for an ambient light component; smaller region means are
/// raised to it.
pub const AMBIENT_LIGHT_FLOOR: f32 = 1e-4;

/// Per-channel color of the unattenuated airlight. All components are
/// finite and strictly positive, with finite reciprocals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight([f32; 3]);

impl AmbientLight {
    pub fn new(r: f32, g: f32, b: f32) -> Result<Self> {
        let rgb = [r, g, b];
        if rgb.iter().any(|v| !(v.is_finite() && *v > 0.0 && v.recip().is_finite())) {
            return Err(DehazeError::NumericDegeneracy(format!(
                "ambient light components must be positive with a finite reciprocal, got {:?}",
                rgb
            )));
        }
        Ok(Self(rgb))
    }

    pub fn rgb(&self) -> [f32; 3] {
        self.0
    }

    #[inline]
    pub fn channel(&self, c: usize) -> f32 {
        self.0[c]
    }

    pub fn reciprocal(&self) -> [f32; 3] {
        [1.0 / self.0[0], 1.0 / self.0[1], 1.0 / self.0[2]]
    }
}

/// Quadrants of `region` in search order: top-left, top-right, bottom-right,
/// bottom-left.
///
/// Quadrants are `ceil(w / 2) x ceil(h / 2)` but start at `floor(w / 2)` /
/// `floor(h / 2)`, so on odd sizes neighbours share the middle row or column.
fn quadrants(region: &Region) -> [Region; 4] {
    let qw = region.width.div_ceil(2);
    let qh = region.height.div_ceil(2);
    let mid_x = region.x + region.width / 2;
    let mid_y = region.y + region.height / 2;

    [
        Region::new(region.x, region.y, qw, qh),
        Region::new(mid_x, region.y, qw, qh),
        Region::new(mid_x, mid_y, qw, qh),
        Region::new(region.x, mid_y, qw, qh),
    ]
}

/// Narrow `region` down to its brightest sub-region, `depth` levels deep.
///
/// Stops early once the region is a single row or column wide. Ties keep
/// the earlier quadrant; if no quadrant sum is above zero the top-left one
/// is taken. Fails if `region` does not lie inside the integral image.
pub fn find_bright_region(integral: &IntegralImage, region: Region, depth: u32) -> Result<Region> {
    let (height, width) = integral.source_dim();
    if !region.fits_within((height, width)) {
        return Err(DehazeError::invalid(
            "region",
            format!("{:?} does not fit a {}x{} dark channel", region, width, height),
        ));
    }
    Ok(descend(integral, region, depth))
}

fn descend(integral: &IntegralImage, region: Region, depth: u32) -> Region {
    if depth == 0 || region.width <= 1 || region.height <= 1 {
        return region;
    }

    let candidates = quadrants(&region);
    let mut best = candidates[0];
    let mut best_sum = 0.0f64;

    for quadrant in candidates.iter() {
        let sum = integral.region_sum(quadrant);
        if sum > best_sum {
            best_sum = sum;
            best = *quadrant;
        }
    }

    trace!(?region, depth, selected = ?best, sum = best_sum, "quadrant search");
    descend(integral, best, depth - 1)
}

/// Locate the brightest region of a dark channel.
pub fn bright_region(dark: ArrayView2<f32>, depth: u32) -> Result<Region> {
    validate_search_depth(depth)?;
    let (height, width) = dark.dim();
    if height == 0 || width == 0 {
        return Err(DehazeError::EmptyImage);
    }

    let integral = IntegralImage::new(dark);
    find_bright_region(&integral, Region::covering((height, width)), depth)
}

/// Mean color of `input` over `region`, as an [`AmbientLight`].
///
/// A channel whose mean is below [`AMBIENT_LIGHT_FLOOR`] is raised to it;
/// negative or non-finite means are rejected.
pub fn ambient_light_in(input: ArrayView3<f32>, region: &Region) -> Result<AmbientLight> {
    let (height, width) = color_dims(&input)?;
    if !region.fits_within((height, width)) {
        return Err(DehazeError::invalid(
            "region",
            format!("{:?} does not fit a {}x{} image", region, width, height),
        ));
    }

    let mut sums = [0.0f64; 3];
    for y in region.y..region.bottom() {
        for x in region.x..region.right() {
            for (c, sum) in sums.iter_mut().enumerate() {
                *sum += input[[y, x, c]] as f64;
            }
        }
    }

    let count = region.area() as f64;
    let mut rgb = [0.0f32; 3];
    for c in 0..3 {
        let mean = (sums[c] / count) as f32;
        if !mean.is_finite() || mean < 0.0 {
            return Err(DehazeError::NumericDegeneracy(format!(
                "ambient light channel {} has mean {} over {:?}",
                c, mean, region
            )));
        }
        rgb[c] = if mean < AMBIENT_LIGHT_FLOOR {
            warn!(channel = c, mean, floor = AMBIENT_LIGHT_FLOOR, "ambient light channel below floor");
            AMBIENT_LIGHT_FLOOR
        } else {
            mean
        };
    }

    AmbientLight::new(rgb[0], rgb[1], rgb[2])
}

/// Estimate the ambient light of `input` from its dark channel.
///
/// # Returns
/// The region the search settled on and the mean color over it
pub fn estimate_ambient_light(
    input: ArrayView3<f32>,
    dark: ArrayView2<f32>,
    depth: u32,
) -> Result<(Region, AmbientLight)> {
    let dims = color_dims(&input)?;
    ensure_same_shape(dims, dark.dim())?;

    let region = bright_region(dark, depth)?;
    let light = ambient_light_in(input, &region)?;
    debug!(?region, rgb = ?light.rgb(), "ambient light");

    Ok((region, light))
}
