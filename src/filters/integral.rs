//! Integral image (summed-area table) and the box filter built on it.
//!
//! Both the atmospheric light search and the guided filter query rectangle
//! sums through [`IntegralImage`], so window clipping at the image border is
//! identical everywhere it is used.
//!
//! Sums are accumulated in f64; an f32 table loses whole units of precision
//! on frames of a few megapixels.

use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Region covering a whole image of the given `(height, width)`.
    pub fn covering(dim: (usize, usize)) -> Self {
        Self::new(0, 0, dim.1, dim.0)
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// True if the region is non-empty and lies inside a `(height, width)` image.
    pub fn fits_within(&self, dim: (usize, usize)) -> bool {
        self.width >= 1 && self.height >= 1 && self.bottom() <= dim.0 && self.right() <= dim.1
    }
}

/// Prefix sums of a single-channel image.
///
/// Cell `[y, x]` holds the sum of all source pixels with row < y and
/// column < x, so the table is one larger than the source in each direction.
#[derive(Debug, Clone)]
pub struct IntegralImage {
    sums: Array2<f64>,
}

impl IntegralImage {
    pub fn new(src: ArrayView2<f32>) -> Self {
        let (height, width) = src.dim();
        let mut sums = Array2::<f64>::zeros((height + 1, width + 1));

        for y in 0..height {
            let mut row_sum = 0.0f64;
            for x in 0..width {
                row_sum += src[[y, x]] as f64;
                sums[[y + 1, x + 1]] = sums[[y, x + 1]] + row_sum;
            }
        }

        Self { sums }
    }

    /// `(height, width)` of the source image.
    pub fn source_dim(&self) -> (usize, usize) {
        let (h, w) = self.sums.dim();
        (h - 1, w - 1)
    }

    /// Sum over the half-open rectangle `[x0, x1) x [y0, y1)`.
    #[inline]
    pub fn sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
        self.sums[[y1, x1]] - self.sums[[y0, x1]] - self.sums[[y1, x0]] + self.sums[[y0, x0]]
    }

    #[inline]
    pub fn region_sum(&self, region: &Region) -> f64 {
        self.sum(region.x, region.y, region.right(), region.bottom())
    }
}

/// Local mean over a `(2 * radius + 1)` square window.
///
/// Windows are clipped at the image border and divided by the number of
/// pixels actually covered, so a constant image stays constant.
pub fn box_mean(src: ArrayView2<f32>, radius: usize) -> Array2<f32> {
    let (height, width) = src.dim();
    let integral = IntegralImage::new(src);
    let mut output = Array2::<f32>::zeros((height, width));

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let y0 = y.saturating_sub(radius);
            let y1 = (y + radius + 1).min(height);

            for x in 0..width {
                let x0 = x.saturating_sub(radius);
                let x1 = (x + radius + 1).min(width);

                let count = ((y1 - y0) * (x1 - x0)) as f64;
                row[x] = (integral.sum(x0, y0, x1, y1) / count) as f32;
            }
        });

    output
}
