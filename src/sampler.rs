//! Reading a single color back out of a rendered field.

use crate::color::{self, HexColor};
use crate::field::{FieldStrategy, PixelBuffer};

/// Pixel under normalized `(hue, lightness)`.
///
/// Lightness is inverted onto the vertical axis exactly as the renderer lays
/// it out. Positions past an edge clamp to the nearest pixel.
pub fn pixel_coords(width: u32, height: u32, hue: f64, lightness: f64) -> (u32, u32) {
    let x = (hue * width as f64).round();
    let y = ((1.0 - lightness) * height as f64).round();
    (clamp_to_axis(x, width), clamp_to_axis(y, height))
}

fn clamp_to_axis(v: f64, len: u32) -> u32 {
    let last = len.saturating_sub(1);
    // NaN lands on the first pixel.
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= last as f64 {
        last
    } else {
        v as u32
    }
}

/// Color of the field at `(hue, lightness)`.
pub fn sample(field: &PixelBuffer, hue: f64, lightness: f64) -> HexColor {
    let (x, y) = pixel_coords(field.width(), field.height(), hue, lightness);
    color::rgb_to_hex(field.pixel(x, y))
}

/// Like [`sample`], reading through the strategy that produced `field`.
pub fn sample_with(
    strategy: &dyn FieldStrategy,
    field: &PixelBuffer,
    hue: f64,
    lightness: f64,
) -> HexColor {
    let (x, y) = pixel_coords(field.width(), field.height(), hue, lightness);
    color::rgb_to_hex(strategy.read_pixel(field, x, y))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::color::Rgb;
    use crate::contrast;
    use crate::field::SoftwareRasterizer;

    #[test]
    fn coords_invert_lightness() {
        assert_eq!(pixel_coords(100, 50, 0.0, 1.0), (0, 0));
        assert_eq!(pixel_coords(100, 50, 0.5, 0.5), (50, 25));
        assert_eq!(pixel_coords(100, 50, 0.25, 0.0), (25, 49));
    }

    #[test]
    fn coords_clamp_past_edges() {
        assert_eq!(pixel_coords(100, 50, 1.0, 0.0), (99, 49));
        assert_eq!(pixel_coords(100, 50, 1.3, -0.2), (99, 49));
        assert_eq!(pixel_coords(100, 50, -0.01, 1.5), (0, 0));
        assert_eq!(pixel_coords(100, 50, f64::NAN, f64::NAN), (0, 0));
    }

    #[test]
    fn coords_round_to_nearest() {
        assert_eq!(pixel_coords(10, 10, 0.14, 0.86), (1, 1));
        assert_eq!(pixel_coords(10, 10, 0.16, 0.84), (2, 2));
    }

    #[test]
    fn sample_reads_written_pixel() {
        let mut field = PixelBuffer::new(4, 4, 1.0).unwrap();
        field.set_pixel(2, 1, Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(sample(&field, 0.5, 0.75).as_str(), "#123456");
    }

    #[test]
    fn sample_agrees_with_evaluate_at_center() {
        let strategy = SoftwareRasterizer::default();
        let mut renderer = SoftwareRasterizer::default();
        let field = renderer.render(200, 200, 0.5).unwrap();
        let eval = contrast::evaluate(0.5, 0.5, 0.5);
        assert_eq!(sample_with(&strategy, &field, 0.5, 0.5), eval.rgb.to_hex());
        assert_eq!(sample(&field, 0.5, 0.5), eval.rgb.to_hex());
    }
}
