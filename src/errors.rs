//! Error type shared by all dehaze stages.
//!
//! Every check runs before a stage touches pixel data, so an error never
//! leaves a partially written output behind.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DehazeError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DehazeError {
    #[error("shape mismatch: expected {expected:?} (height, width), found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("unsupported channel count {0}, expected 3 (RGB) or 4 (RGBA)")]
    UnsupportedChannels(usize),

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    #[error("image has zero width or height")]
    EmptyImage,
}

impl DehazeError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        DehazeError::InvalidParameter { name, reason: reason.into() }
    }
}

#[cfg(feature = "python")]
impl From<DehazeError> for pyo3::PyErr {
    fn from(err: DehazeError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

/// Fails with `ShapeMismatch` unless both (height, width) pairs agree.
pub fn ensure_same_shape(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected != found {
        return Err(DehazeError::ShapeMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_check() {
        assert!(ensure_same_shape((4, 5), (4, 5)).is_ok());
        assert_eq!(
            ensure_same_shape((4, 5), (5, 4)),
            Err(DehazeError::ShapeMismatch { expected: (4, 5), found: (5, 4) })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = DehazeError::invalid("patch_size", "must be odd");
        assert_eq!(err.to_string(), "invalid parameter 'patch_size': must be odd");
        assert!(DehazeError::UnsupportedChannels(1).to_string().contains("channel count 1"));
    }
}
