//! Dehaze Rust Extensions
//!
//! Single-image haze removal with the dark channel prior, implemented in
//! Rust with optional Python bindings via PyO3 and WASM bindings for
//! JavaScript.
//!
//! ## Image Format
//! - **Color input**: (height, width, 3) RGB or (height, width, 4) RGBA, f32 0.0-1.0
//! - **Maps**: (height, width) f32 (dark channel, transmission)
//!
//! 8-bit frames are converted at the boundary with
//! [`filters::grayscale::u8_to_f32`] and [`filters::grayscale::f32_to_u8`].
//!
//! ## Pipeline
//! dark channel -> ambient light -> transmission -> (guided refinement) ->
//! radiance recovery. See the [`mod@dehaze`] module for the stages and [`DehazeParams`] for
//! the tunables.
//!
//! ## Logging
//! Stages emit `tracing` events (`debug` per stage, `trace` per quadrant
//! search step). Install a subscriber in the host application to see them.

pub mod errors;
pub mod filters;
pub mod dehaze;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use dehaze::{dehaze, dehaze_detailed, AmbientLight, DehazeOutput, DehazeParams};
pub use errors::{DehazeError, Result};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray3};
    use pyo3::prelude::*;

    use crate::dehaze::atmospheric::estimate_ambient_light;
    use crate::dehaze::color_dims;
    use crate::dehaze::dark_channel::dark_channel as dark_channel_impl;
    use crate::dehaze::params::{
        DehazeParams, DEFAULT_GUIDED_EPS, DEFAULT_GUIDED_RADIUS, DEFAULT_MIN_TRANSMISSION,
        DEFAULT_OMEGA, DEFAULT_PATCH_SIZE, DEFAULT_SEARCH_DEPTH,
    };
    use crate::dehaze::pipeline::dehaze_detailed;
    use crate::filters::edge::sobel_edges;
    use crate::filters::grayscale::{f32_to_u8, u8_to_f32};

    // ========================================================================
    // Dehaze
    // ========================================================================

    /// Remove haze from an RGB(A) f32 image (values 0.0-1.0).
    ///
    /// Output is unclamped; values may leave 0.0-1.0.
    #[pyfunction]
    #[pyo3(signature = (
        image,
        patch_size=DEFAULT_PATCH_SIZE,
        search_depth=DEFAULT_SEARCH_DEPTH,
        omega=DEFAULT_OMEGA,
        refine=false,
        guided_radius=DEFAULT_GUIDED_RADIUS,
        guided_eps=DEFAULT_GUIDED_EPS,
        min_transmission=DEFAULT_MIN_TRANSMISSION,
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn dehaze<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        patch_size: usize,
        search_depth: u32,
        omega: f32,
        refine: bool,
        guided_radius: usize,
        guided_eps: f32,
        min_transmission: f32,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let params = DehazeParams {
            patch_size,
            search_depth,
            omega,
            refine,
            guided_radius,
            guided_eps,
            min_transmission,
        };
        let output = dehaze_detailed(image.as_array(), &params)?;
        Ok(output.recovered.into_pyarray(py))
    }

    /// Remove haze from an RGB(A) u8 image with default parameters.
    ///
    /// Output is clamped and converted back to u8.
    #[pyfunction]
    pub fn dehaze_u8<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = u8_to_f32(image.as_array());
        let output = dehaze_detailed(input.view(), &DehazeParams::default())?;
        Ok(f32_to_u8(output.recovered.view()).into_pyarray(py))
    }

    // ========================================================================
    // Debug Outputs
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, patch_size=DEFAULT_PATCH_SIZE))]
    pub fn dark_channel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        patch_size: usize,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let result = dark_channel_impl(image.as_array(), patch_size)?;
        Ok(result.into_pyarray(py))
    }

    /// Ambient light as an (r, g, b) tuple.
    #[pyfunction]
    #[pyo3(signature = (image, patch_size=DEFAULT_PATCH_SIZE, search_depth=DEFAULT_SEARCH_DEPTH))]
    pub fn ambient_light(
        image: PyReadonlyArray3<'_, f32>,
        patch_size: usize,
        search_depth: u32,
    ) -> PyResult<(f32, f32, f32)> {
        let input = image.as_array();
        let dark = dark_channel_impl(input, patch_size)?;
        let (_, light) = estimate_ambient_light(input, dark.view(), search_depth)?;
        let [r, g, b] = light.rgb();
        Ok((r, g, b))
    }

    /// Transmission map (refined if requested), before the `min_transmission`
    /// floor is applied.
    #[pyfunction]
    #[pyo3(signature = (
        image,
        patch_size=DEFAULT_PATCH_SIZE,
        omega=DEFAULT_OMEGA,
        refine=false,
        guided_radius=DEFAULT_GUIDED_RADIUS,
        guided_eps=DEFAULT_GUIDED_EPS,
    ))]
    pub fn transmission_map<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        patch_size: usize,
        omega: f32,
        refine: bool,
        guided_radius: usize,
        guided_eps: f32,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let params = DehazeParams {
            patch_size,
            omega,
            refine,
            guided_radius,
            guided_eps,
            ..DehazeParams::default()
        };
        let output = dehaze_detailed(image.as_array(), &params)?;
        Ok(output.transmission().clone().into_pyarray(py))
    }

    #[pyfunction]
    pub fn edges<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
    ) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let input = image.as_array();
        color_dims(&input)?;
        Ok(sobel_edges(input).into_pyarray(py))
    }

    /// Dehaze Rust extension module
    #[pymodule]
    pub fn dehaze_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(dehaze, m)?)?;
        m.add_function(wrap_pyfunction!(dehaze_u8, m)?)?;

        // Debug outputs
        m.add_function(wrap_pyfunction!(dark_channel, m)?)?;
        m.add_function(wrap_pyfunction!(ambient_light, m)?)?;
        m.add_function(wrap_pyfunction!(transmission_map, m)?)?;
        m.add_function(wrap_pyfunction!(edges, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::dehaze_rust;
