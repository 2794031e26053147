//! Generic image primitives the dehaze stages are built from.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Map | (H, W) | f32 | Single channel (dark channel, transmission, guide) |
//! | RGB float | (H, W, 3) | f32 | Red, green, blue, 0.0-1.0 |
//! | RGBA float | (H, W, 4) | f32 | RGB + alpha, alpha ignored by the primitives |
//! | RGB8 / RGBA8 | (H, W, 3 or 4) | u8 | Boundary format, see [`grayscale::u8_to_f32`] |
//!
//! ## Modules
//!
//! - **integral**: summed-area table, [`integral::Region`], clipped box mean
//! - **morphology**: channel minimum, corner-anchored erosion
//! - **grayscale**: luminance guide, u8/f32 conversion
//! - **edge**: Sobel edge map for debug output

pub mod integral;
pub mod morphology;
pub mod grayscale;
pub mod edge;
