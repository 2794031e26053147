//! Tunable parameters of the dehaze pipeline.
//!
//! Defaults follow He et al.: 15 px patches, omega 0.95, guided filter
//! radius 60 with eps 1e-4, and a transmission floor of 0.1. Partial configs
//! deserialize with the remaining fields defaulted.

use serde::{Deserialize, Serialize};

use crate::errors::{DehazeError, Result};

pub const DEFAULT_PATCH_SIZE: usize = 15;
pub const DEFAULT_SEARCH_DEPTH: u32 = 5;
pub const DEFAULT_OMEGA: f32 = 0.95;
pub const DEFAULT_GUIDED_RADIUS: usize = 60;
pub const DEFAULT_GUIDED_EPS: f32 = 1e-4;
pub const DEFAULT_MIN_TRANSMISSION: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DehazeParams {
    /// Side of the erosion neighborhood for both dark channel passes. Odd, >= 1.
    pub patch_size: usize,
    /// Number of quadrant subdivisions in the ambient light search.
    pub search_depth: u32,
    /// Haze removal strength; `1 - omega` of the haze is kept.
    pub omega: f32,
    /// Run the guided filter on the raw transmission.
    pub refine: bool,
    pub guided_radius: usize,
    pub guided_eps: f32,
    /// Floor applied to the transmission before recovery.
    pub min_transmission: f32,
}

impl Default for DehazeParams {
    fn default() -> Self {
        Self {
            patch_size: DEFAULT_PATCH_SIZE,
            search_depth: DEFAULT_SEARCH_DEPTH,
            omega: DEFAULT_OMEGA,
            refine: false,
            guided_radius: DEFAULT_GUIDED_RADIUS,
            guided_eps: DEFAULT_GUIDED_EPS,
            min_transmission: DEFAULT_MIN_TRANSMISSION,
        }
    }
}

impl DehazeParams {
    pub fn with_patch_size(mut self, patch_size: usize) -> Self {
        self.patch_size = patch_size;
        self
    }

    pub fn with_search_depth(mut self, search_depth: u32) -> Self {
        self.search_depth = search_depth;
        self
    }

    pub fn with_omega(mut self, omega: f32) -> Self {
        self.omega = omega;
        self
    }

    /// Enable guided refinement with the given window radius and eps.
    pub fn with_refinement(mut self, radius: usize, eps: f32) -> Self {
        self.refine = true;
        self.guided_radius = radius;
        self.guided_eps = eps;
        self
    }

    pub fn with_min_transmission(mut self, min_transmission: f32) -> Self {
        self.min_transmission = min_transmission;
        self
    }

    /// Check every field before any pixel is touched.
    pub fn validate(&self) -> Result<()> {
        validate_patch_size(self.patch_size)?;
        validate_search_depth(self.search_depth)?;
        validate_omega(self.omega)?;
        if self.refine {
            validate_guided(self.guided_radius, self.guided_eps)?;
        }
        validate_min_transmission(self.min_transmission)
    }
}

pub(crate) fn validate_patch_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(DehazeError::invalid("patch_size", "must be at least 1"));
    }
    if size % 2 == 0 {
        return Err(DehazeError::invalid("patch_size", format!("must be odd, got {}", size)));
    }
    Ok(())
}

pub(crate) fn validate_search_depth(depth: u32) -> Result<()> {
    if depth == 0 {
        return Err(DehazeError::invalid("search_depth", "must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_omega(omega: f32) -> Result<()> {
    if !(omega > 0.0 && omega <= 1.0) {
        return Err(DehazeError::invalid("omega", format!("must be in (0, 1], got {}", omega)));
    }
    Ok(())
}

pub(crate) fn validate_guided(radius: usize, eps: f32) -> Result<()> {
    if radius == 0 {
        return Err(DehazeError::invalid("guided_radius", "must be at least 1"));
    }
    if !(eps.is_finite() && eps > 0.0) {
        return Err(DehazeError::invalid("guided_eps", format!("must be positive and finite, got {}", eps)));
    }
    Ok(())
}

pub(crate) fn validate_min_transmission(floor: f32) -> Result<()> {
    if !(floor > 0.0 && floor <= 1.0) {
        return Err(DehazeError::invalid(
            "min_transmission",
            format!("must be in (0, 1], got {}", floor),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = DehazeParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.patch_size, 15);
        assert_eq!(params.search_depth, 5);
        assert!(!params.refine);
    }

    #[test]
    fn test_rejects_bad_patch_size() {
        assert!(DehazeParams::default().with_patch_size(0).validate().is_err());
        assert!(DehazeParams::default().with_patch_size(4).validate().is_err());
        assert!(DehazeParams::default().with_patch_size(1).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = DehazeParams::default().with_search_depth(0).validate().unwrap_err();
        assert!(matches!(err, DehazeError::InvalidParameter { name: "search_depth", .. }));
    }

    #[test]
    fn test_guided_checked_only_when_enabled() {
        let mut params = DehazeParams::default();
        params.guided_radius = 0;
        assert!(params.validate().is_ok());

        assert!(DehazeParams::default().with_refinement(0, 1e-4).validate().is_err());
        assert!(DehazeParams::default().with_refinement(8, 0.0).validate().is_err());
        assert!(DehazeParams::default().with_refinement(8, f32::NAN).validate().is_err());
        assert!(DehazeParams::default().with_refinement(8, 1e-3).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_omega_and_floor() {
        assert!(DehazeParams::default().with_omega(0.0).validate().is_err());
        assert!(DehazeParams::default().with_omega(1.5).validate().is_err());
        assert!(DehazeParams::default().with_omega(f32::NAN).validate().is_err());
        assert!(DehazeParams::default().with_min_transmission(0.0).validate().is_err());
        assert!(DehazeParams::default().with_min_transmission(-0.1).validate().is_err());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let params: DehazeParams =
            serde_json::from_str(r#"{ "patch_size": 7, "refine": true }"#).unwrap();

        assert_eq!(params.patch_size, 7);
        assert!(params.refine);
        assert_eq!(params.guided_radius, DEFAULT_GUIDED_RADIUS);
        assert_eq!(params.min_transmission, DEFAULT_MIN_TRANSMISSION);
    }

    #[test]
    fn test_config_roundtrip() {
        let params = DehazeParams::default().with_omega(0.8).with_refinement(20, 1e-3);
        let json = serde_json::to_string(&params).unwrap();
        let back: DehazeParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
