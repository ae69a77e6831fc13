//! The contrast-constrained color field.
//!
//! A field point is addressed by (hue, saturation, lightness), all 0.0–1.0.
//! Its color comes from a smooth, trig-free hue ramp that is mixed toward
//! white by saturation and scaled by lightness. The quantized color is then
//! checked against the text color; points that fall short of the minimum
//! contrast are replaced by black outright.

use crate::color::Rgb;
use crate::constants;
use crate::error::PickerError;

/// Fully saturated, full-lightness color for `hue`.
///
/// Each channel is a clamped triangle wave over the hue circle, smoothed with
/// `x²(3 − 2x)` so the field has no visible banding at the hue sextants.
pub fn hue_ramp(hue: f64) -> [f64; 3] {
    const OFFSETS: [f64; 3] = [0.0, 4.0, 2.0];
    OFFSETS.map(|offset| {
        let x = (((hue * 6.0 + offset).rem_euclid(6.0) - 3.0).abs() - 1.0).clamp(0.0, 1.0);
        x * x * (3.0 - 2.0 * x)
    })
}

/// Mix a hue ramp toward white by `saturation`, then scale by `lightness`.
pub fn shade(ramp: [f64; 3], saturation: f64, lightness: f64) -> [f64; 3] {
    ramp.map(|c| lightness * (1.0 + saturation * (c - 1.0)))
}

/// Unmasked field color at (hue, saturation, lightness), channels 0.0–1.0.
pub fn field_rgb(hue: f64, saturation: f64, lightness: f64) -> [f64; 3] {
    shade(hue_ramp(hue), saturation, lightness)
}

/// Relative luminance with the default gamma.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    luminance_with_gamma(rgb, constants::LUMINANCE_GAMMA)
}

fn luminance_with_gamma(rgb: Rgb, gamma: f64) -> f64 {
    let (r, g, b) = rgb.to_unit();
    let [wr, wg, wb] = constants::LUMINANCE_WEIGHTS;
    wr * r.powf(gamma) + wg * g.powf(gamma) + wb * b.powf(gamma)
}

/// Contrast ratio between two luminances; order does not matter.
pub fn contrast_ratio(lum1: f64, lum2: f64) -> f64 {
    let brightest = lum1.max(lum2);
    let darkest = lum1.min(lum2);
    (brightest + 0.05) / (darkest + 0.05)
}

/// Outcome of evaluating a single field point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Color emitted into the field: the quantized color, or black if it failed.
    pub rgb: Rgb,
    /// Whether the quantized color meets the minimum contrast.
    pub passes: bool,
    /// Contrast ratio of the quantized color against the text color.
    pub ratio: f64,
}

/// Validated parameters of the field generation function.
///
/// Built once and shared by every render; the equivalent of a compiled
/// shader program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldProgram {
    min_contrast: f64,
    text_color: Rgb,
    gamma: f64,
    text_luminance: f64,
}

impl Default for FieldProgram {
    fn default() -> Self {
        Self {
            min_contrast: constants::MIN_CONTRAST,
            text_color: constants::TEXT_COLOR,
            gamma: constants::LUMINANCE_GAMMA,
            text_luminance: luminance_with_gamma(constants::TEXT_COLOR, constants::LUMINANCE_GAMMA),
        }
    }
}

impl FieldProgram {
    /// Build a program for a custom threshold, text color or gamma.
    ///
    /// Contrast ratios live in `[1, 21]`, so a threshold outside that range
    /// can never produce a meaningful field.
    pub fn build(min_contrast: f64, text_color: Rgb, gamma: f64) -> Result<Self, PickerError> {
        if !min_contrast.is_finite() || !(1.0..=21.0).contains(&min_contrast) {
            return Err(PickerError::ProgramBuild(format!(
                "minimum contrast {min_contrast} is outside [1, 21]"
            )));
        }
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(PickerError::ProgramBuild(format!(
                "gamma {gamma} must be finite and positive"
            )));
        }
        Ok(Self {
            min_contrast,
            text_color,
            gamma,
            text_luminance: luminance_with_gamma(text_color, gamma),
        })
    }

    pub fn min_contrast(&self) -> f64 {
        self.min_contrast
    }

    pub fn text_color(&self) -> Rgb {
        self.text_color
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Contrast ratio of `rgb` against this program's text color.
    pub fn contrast_against_text(&self, rgb: Rgb) -> f64 {
        contrast_ratio(luminance_with_gamma(rgb, self.gamma), self.text_luminance)
    }

    /// Evaluate one field point.
    pub fn evaluate(&self, hue: f64, saturation: f64, lightness: f64) -> Evaluation {
        self.evaluate_ramp(hue_ramp(hue), saturation, lightness)
    }

    /// Evaluate with a precomputed [`hue_ramp`]; identical to [`Self::evaluate`].
    pub fn evaluate_ramp(&self, ramp: [f64; 3], saturation: f64, lightness: f64) -> Evaluation {
        let [r, g, b] = shade(ramp, saturation, lightness);
        let candidate = Rgb::from_unit(r, g, b);
        let ratio = self.contrast_against_text(candidate);
        let passes = ratio >= self.min_contrast;
        Evaluation {
            rgb: if passes { candidate } else { constants::MASK_COLOR },
            passes,
            ratio,
        }
    }
}

/// Evaluate one field point against white text at 4.5:1.
pub fn evaluate(hue: f64, saturation: f64, lightness: f64) -> Evaluation {
    FieldProgram::default().evaluate(hue, saturation, lightness)
}
