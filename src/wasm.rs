//! WebAssembly exports for the dehaze pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Frames are
//! passed as flat RGBA buffers (length = width * height * 4), the layout of
//! canvas `ImageData`.
//!
//! ## Bit Depth Support
//!
//! - **u8**: 8-bit per channel (0-255), output clamped
//! - **f32**: Float per channel (0.0-1.0), output unclamped

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::dehaze::params::DehazeParams;
use crate::dehaze::pipeline::dehaze;
use crate::filters::edge::sobel_edges;
use crate::filters::grayscale::{f32_to_u8, u8_to_f32};

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn rgba_array<T>(data: &[T], width: usize, height: usize) -> Result<Array3<T>, JsValue>
where
    T: Clone,
{
    Array3::from_shape_vec((height, width, 4), data.to_vec()).map_err(to_js)
}

/// Parameters from a JSON string; an empty string selects the defaults.
fn parse_params(params_json: &str) -> Result<DehazeParams, JsValue> {
    if params_json.trim().is_empty() {
        return Ok(DehazeParams::default());
    }
    serde_json::from_str(params_json).map_err(to_js)
}

// ============================================================================
// Dehaze - u8 (8-bit)
// ============================================================================

/// Remove haze from an RGBA u8 frame.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `params_json` - `DehazeParams` as JSON, missing fields use defaults
///
/// # Returns
/// Flat array of RGBA bytes, alpha unchanged
#[wasm_bindgen]
pub fn dehaze_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    params_json: &str,
) -> Result<Vec<u8>, JsValue> {
    let params = parse_params(params_json)?;
    let input = u8_to_f32(rgba_array(data, width, height)?.view());

    let result = dehaze(input.view(), &params).map_err(to_js)?;
    Ok(f32_to_u8(result.view()).into_raw_vec_and_offset().0)
}

// ============================================================================
// Dehaze - f32 (float)
// ============================================================================

/// Remove haze from an RGBA f32 frame (values 0.0-1.0).
#[wasm_bindgen]
pub fn dehaze_rgba_f32_wasm(
    data: &[f32],
    width: usize,
    height: usize,
    params_json: &str,
) -> Result<Vec<f32>, JsValue> {
    let params = parse_params(params_json)?;
    let input = rgba_array(data, width, height)?;

    let result = dehaze(input.view(), &params).map_err(to_js)?;
    Ok(result.into_raw_vec_and_offset().0)
}

// ============================================================================
// Edge Map
// ============================================================================

/// Sobel edge map of an RGBA u8 frame, one byte per pixel.
#[wasm_bindgen]
pub fn edges_rgba_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let input = u8_to_f32(rgba_array(data, width, height)?.view());
    let edges = sobel_edges(input.view());
    Ok(edges
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect())
}
