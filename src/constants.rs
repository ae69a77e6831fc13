//! Thresholds, sizing, color, and styling constants for the picker.

use crate::color::Rgb;

/// Minimum contrast ratio against the text color (WCAG AA, normal text)
pub const MIN_CONTRAST: f64 = 4.5;

/// Exponent used to linearize channels before taking luminance
pub const LUMINANCE_GAMMA: f64 = 2.2;

/// Relative luminance weights for (R, G, B)
pub const LUMINANCE_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Text color the field is checked against
pub const TEXT_COLOR: Rgb = Rgb::new(255, 255, 255);

/// Color emitted for field points that fail the contrast check
pub const MASK_COLOR: Rgb = Rgb::new(0, 0, 0);

/// Keyboard step for the 0–1 sliders
pub const SLIDER_STEP: f64 = 0.01;

/// Largest backing surface, per axis, the renderer will allocate
pub const MAX_SURFACE_DIMENSION: u32 = 8192;

/// Backing size used before the widget has been laid out
pub const DEFAULT_FIELD_SIZE: u32 = 256;

/// 1D slider track height
pub const SLIDER_HEIGHT: f32 = 16.0;

/// Marker circle radius on the 2D field
pub const MARKER_RADIUS: f64 = 8.0;

/// Thumb radius on 1D sliders
pub const THUMB_RADIUS: f64 = 7.0;

/// Border radius for the field and output swatch
pub const RADIUS: f32 = 4.0;

/// Gap between picker elements
pub const GAP: f32 = 8.0;

/// Padding around the whole picker
pub const PADDING: f32 = 8.0;

/// Minimum height of the 2D field
pub const FIELD_MIN_HEIGHT: f32 = 160.0;

/// Picked color output width
pub const OUTPUT_WIDTH: f32 = 96.0;

/// Output font size
pub const OUTPUT_FONT: f32 = 12.0;

/// Label font size
pub const LABEL_FONT: f32 = 10.0;
