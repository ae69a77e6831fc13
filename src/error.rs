//! Error type shared by the color math, the field renderer and the controller.

use thiserror::Error;

/// Errors surfaced by the picker.
///
/// Color conversions and contrast math are total once their input has been
/// validated, so the only failures are malformed input at the boundary and
/// a render backend that cannot be brought up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PickerError {
    /// A hex color did not match `#RRGGBB`.
    #[error("invalid hex color: {0}")]
    InvalidColorFormat(String),

    /// The render surface could not be created at the requested size.
    #[error("render surface unavailable: {0}")]
    RenderSurfaceUnavailable(String),

    /// The field program was rejected while building it.
    #[error("field program failed to build: {0}")]
    ProgramBuild(String),
}
