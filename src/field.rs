//! Rasterization of the contrast field into an RGBA8 pixel buffer.
//!
//! Column `x` maps to hue `x / width`, row `y` maps to lightness
//! `1 - y / height` (top is the lightest row). The field only depends on the
//! surface size and saturation; moving the marker never re-renders it.

use std::time::Instant;

use tracing::{debug, trace};

use crate::color::{HexColor, Rgb};
use crate::constants;
use crate::contrast::{self, FieldProgram};
use crate::error::PickerError;
use crate::sampler;

/// Hue at the left edge of column `x`.
pub fn hue_at_column(x: u32, width: u32) -> f64 {
    x as f64 / width as f64
}

/// Lightness at the top edge of row `y`; rows run from light to dark.
pub fn lightness_at_row(y: u32, height: u32) -> f64 {
    1.0 - y as f64 / height as f64
}

fn check_surface_size(width: u32, height: u32) -> Result<usize, PickerError> {
    if width == 0 || height == 0 {
        return Err(PickerError::RenderSurfaceUnavailable(format!(
            "zero-sized surface {width}x{height}"
        )));
    }
    let max = constants::MAX_SURFACE_DIMENSION;
    if width > max || height > max {
        return Err(PickerError::RenderSurfaceUnavailable(format!(
            "surface {width}x{height} exceeds {max}x{max}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| {
            PickerError::RenderSurfaceUnavailable(format!(
                "surface {width}x{height} cannot be addressed"
            ))
        })
}

/// Rendered field: opaque RGBA8 pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    saturation: f64,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate an all-black buffer.
    pub fn new(width: u32, height: u32, saturation: f64) -> Result<Self, PickerError> {
        let len = check_surface_size(width, height)?;
        let mut pixels = vec![0u8; len];
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Ok(Self {
            width,
            height,
            saturation,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Saturation the buffer was rendered at.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        (y * self.width as usize + x) * 4
    }

    /// Color at `(x, y)`; coordinates past the edge read the edge pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let o = self.offset(x, y);
        Rgb::new(self.pixels[o], self.pixels[o + 1], self.pixels[o + 2])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: Rgb) {
        let o = self.offset(x, y);
        self.pixels[o] = rgb.r;
        self.pixels[o + 1] = rgb.g;
        self.pixels[o + 2] = rgb.b;
    }

    /// Raw RGBA8 bytes, suitable for uploading as an image.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }
}

/// A way of producing the contrast field.
///
/// Every strategy must produce, for pixel `(x, y)`, the masked color of
/// [`FieldProgram::evaluate`] at `(hue_at_column(x), saturation,
/// lightness_at_row(y))`.
pub trait FieldStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn render(
        &mut self,
        width: u32,
        height: u32,
        saturation: f64,
    ) -> Result<PixelBuffer, PickerError>;

    fn read_pixel(&self, buffer: &PixelBuffer, x: u32, y: u32) -> Rgb {
        buffer.pixel(x, y)
    }
}

/// Evaluates the field program independently for every pixel.
#[derive(Debug, Clone, Default)]
pub struct SoftwareRasterizer {
    program: FieldProgram,
}

impl SoftwareRasterizer {
    pub fn new(program: FieldProgram) -> Self {
        Self { program }
    }
}

impl FieldStrategy for SoftwareRasterizer {
    fn name(&self) -> &'static str {
        "software"
    }

    fn render(
        &mut self,
        width: u32,
        height: u32,
        saturation: f64,
    ) -> Result<PixelBuffer, PickerError> {
        let mut buffer = PixelBuffer::new(width, height, saturation)?;
        for py in 0..height {
            let lightness = lightness_at_row(py, height);
            for px in 0..width {
                let eval = self
                    .program
                    .evaluate(hue_at_column(px, width), saturation, lightness);
                buffer.set_pixel(px, py, eval.rgb);
            }
        }
        Ok(buffer)
    }
}

/// Caches the hue ramp of every column, which only depends on the width.
///
/// Repeated renders at the same width (saturation drags) skip the per-pixel
/// hue evaluation entirely.
#[derive(Debug, Clone, Default)]
pub struct LookupRasterizer {
    program: FieldProgram,
    ramps: Vec<[f64; 3]>,
}

impl LookupRasterizer {
    pub fn new(program: FieldProgram) -> Self {
        Self {
            program,
            ramps: Vec::new(),
        }
    }

    fn ensure_ramps(&mut self, width: u32) {
        if self.ramps.len() == width as usize {
            return;
        }
        self.ramps = (0..width)
            .map(|px| contrast::hue_ramp(hue_at_column(px, width)))
            .collect();
        trace!(width, "rebuilt hue lookup table");
    }
}

impl FieldStrategy for LookupRasterizer {
    fn name(&self) -> &'static str {
        "lookup"
    }

    fn render(
        &mut self,
        width: u32,
        height: u32,
        saturation: f64,
    ) -> Result<PixelBuffer, PickerError> {
        let mut buffer = PixelBuffer::new(width, height, saturation)?;
        self.ensure_ramps(width);
        for py in 0..height {
            let lightness = lightness_at_row(py, height);
            for (px, ramp) in (0..width).zip(self.ramps.iter()) {
                let eval = self.program.evaluate_ramp(*ramp, saturation, lightness);
                buffer.set_pixel(px, py, eval.rgb);
            }
        }
        Ok(buffer)
    }
}

/// Displayed (CSS) size of the surface plus the device scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub scale: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, scale: f64) -> Self {
        Self {
            css_width,
            css_height,
            scale,
        }
    }

    /// Size of the backing pixel buffer.
    pub fn backing_size(&self) -> Result<(u32, u32), PickerError> {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        let to_px = |css: f64| {
            let px = (css * scale).round();
            if px.is_finite() && px >= 0.0 {
                Ok(px.min(u32::MAX as f64) as u32)
            } else {
                Err(PickerError::RenderSurfaceUnavailable(format!(
                    "invalid surface size {}x{}",
                    self.css_width, self.css_height
                )))
            }
        };
        let (width, height) = (to_px(self.css_width)?, to_px(self.css_height)?);
        check_surface_size(width, height)?;
        Ok((width, height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let size = constants::DEFAULT_FIELD_SIZE as f64;
        Self::new(size, size, 1.0)
    }
}

/// Owns the field strategy and the current buffer.
///
/// Size and saturation changes only mark the buffer stale; the next call to
/// [`FieldRenderer::field`] or [`FieldRenderer::sample`] renders once, so a
/// burst of resizes costs a single rasterization.
pub struct FieldRenderer {
    strategy: Box<dyn FieldStrategy>,
    width: u32,
    height: u32,
    saturation: f64,
    buffer: Option<PixelBuffer>,
    generation: u64,
}

impl FieldRenderer {
    /// Create the renderer and render the first field.
    pub fn new(
        strategy: Box<dyn FieldStrategy>,
        width: u32,
        height: u32,
        saturation: f64,
    ) -> Result<Self, PickerError> {
        check_surface_size(width, height)?;
        let mut renderer = Self {
            strategy,
            width,
            height,
            saturation,
            buffer: None,
            generation: 0,
        };
        renderer.ensure_rendered()?;
        Ok(renderer)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Incremented on every render; lets views cache uploaded images.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_stale(&self) -> bool {
        self.buffer.is_none()
    }

    /// Returns whether the size actually changed.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, PickerError> {
        check_surface_size(width, height)?;
        if (width, height) == (self.width, self.height) {
            return Ok(false);
        }
        self.width = width;
        self.height = height;
        self.release();
        Ok(true)
    }

    /// Returns whether the saturation actually changed.
    pub fn set_saturation(&mut self, saturation: f64) -> bool {
        if saturation.to_bits() == self.saturation.to_bits() {
            return false;
        }
        self.saturation = saturation;
        self.release();
        true
    }

    /// Force the next access to re-render.
    pub fn invalidate(&mut self) {
        self.release();
    }

    /// Drop the current buffer.
    pub fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            trace!(
                width = buffer.width(),
                height = buffer.height(),
                "released field buffer"
            );
        }
    }

    fn ensure_rendered(&mut self) -> Result<(), PickerError> {
        if self.buffer.is_some() {
            return Ok(());
        }
        let started = Instant::now();
        let buffer = self
            .strategy
            .render(self.width, self.height, self.saturation)?;
        self.generation += 1;
        debug!(
            strategy = self.strategy.name(),
            width = self.width,
            height = self.height,
            saturation = self.saturation,
            generation = self.generation,
            elapsed = ?started.elapsed(),
            "rendered contrast field"
        );
        self.buffer = Some(buffer);
        Ok(())
    }

    fn current(&self) -> Result<&PixelBuffer, PickerError> {
        self.buffer.as_ref().ok_or_else(|| {
            PickerError::RenderSurfaceUnavailable("field buffer is not rendered".to_string())
        })
    }

    /// Current field, rendering it first if stale.
    pub fn field(&mut self) -> Result<&PixelBuffer, PickerError> {
        self.ensure_rendered()?;
        self.current()
    }

    /// Read the color under `(hue, lightness)`, rendering first if stale.
    pub fn sample(&mut self, hue: f64, lightness: f64) -> Result<HexColor, PickerError> {
        self.ensure_rendered()?;
        let buffer = self.current()?;
        Ok(sampler::sample_with(
            self.strategy.as_ref(),
            buffer,
            hue,
            lightness,
        ))
    }
}

impl Drop for FieldRenderer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn software(width: u32, height: u32, saturation: f64) -> PixelBuffer {
        SoftwareRasterizer::default()
            .render(width, height, saturation)
            .unwrap()
    }

    #[test]
    fn pixel_buffer_starts_opaque_black() {
        let buffer = PixelBuffer::new(2, 2, 0.5).unwrap();
        let expected = vec![0u8, 0, 0, 255].repeat(4);
        assert_eq!(buffer.as_rgba(), expected.as_slice());
    }

    #[test]
    fn out_of_range_reads_clamp_to_edge() {
        let mut buffer = PixelBuffer::new(3, 2, 0.0).unwrap();
        buffer.set_pixel(2, 1, Rgb::new(9, 8, 7));
        assert_eq!(buffer.pixel(40, 40), Rgb::new(9, 8, 7));
    }

    #[test]
    fn zero_sized_surface_is_unavailable() {
        assert!(matches!(
            PixelBuffer::new(0, 10, 1.0),
            Err(PickerError::RenderSurfaceUnavailable(_))
        ));
        assert!(matches!(
            SoftwareRasterizer::default().render(10, 0, 1.0),
            Err(PickerError::RenderSurfaceUnavailable(_))
        ));
    }

    #[test]
    fn oversized_surface_is_unavailable() {
        let too_big = constants::MAX_SURFACE_DIMENSION + 1;
        assert!(matches!(
            PixelBuffer::new(too_big, 1, 1.0),
            Err(PickerError::RenderSurfaceUnavailable(_))
        ));
    }

    #[test]
    fn top_row_is_lightest_bottom_row_darkest() {
        let buffer = software(8, 8, 0.0);
        // Gray field: top-left is lightness 1 (white) and fails, so black.
        assert_eq!(buffer.pixel(0, 0), Rgb::new(0, 0, 0));
        // Lightness 1/8 near the bottom is a dark gray that passes.
        assert_eq!(buffer.pixel(0, 7), Rgb::new(32, 32, 32));
    }

    #[test]
    fn pixels_match_evaluate() {
        let (w, h, s) = (12, 9, 0.8);
        let buffer = software(w, h, s);
        for y in 0..h {
            for x in 0..w {
                let eval = contrast::evaluate(hue_at_column(x, w), s, lightness_at_row(y, h));
                assert_eq!(buffer.pixel(x, y), eval.rgb, "({x}, {y})");
            }
        }
    }

    #[test]
    fn lookup_matches_software() {
        let mut lookup = LookupRasterizer::default();
        for s in [0.0, 0.3, 1.0] {
            assert_eq!(lookup.render(17, 11, s).unwrap(), software(17, 11, s));
        }
        // Width change rebuilds the table.
        assert_eq!(lookup.render(5, 11, 0.6).unwrap(), software(5, 11, 0.6));
    }

    #[test]
    fn viewport_scales_to_backing_size() {
        assert_eq!(Viewport::new(100.0, 50.0, 2.0).backing_size(), Ok((200, 100)));
        assert_eq!(Viewport::new(100.4, 50.0, 1.0).backing_size(), Ok((100, 50)));
        assert_eq!(Viewport::new(10.0, 10.0, f64::NAN).backing_size(), Ok((10, 10)));
        assert!(Viewport::new(0.2, 10.0, 1.0).backing_size().is_err());
        assert!(Viewport::new(f64::INFINITY, 10.0, 1.0).backing_size().is_err());
    }

    #[test]
    fn renderer_coalesces_changes_into_one_render() {
        let mut renderer =
            FieldRenderer::new(Box::new(SoftwareRasterizer::default()), 10, 10, 1.0).unwrap();
        assert_eq!(renderer.generation(), 1);

        assert!(renderer.resize(20, 10).unwrap());
        assert!(renderer.resize(30, 10).unwrap());
        assert!(renderer.set_saturation(0.5));
        assert!(renderer.is_stale());
        assert_eq!(renderer.generation(), 1);

        let field = renderer.field().unwrap();
        assert_eq!((field.width(), field.height(), field.saturation()), (30, 10, 0.5));
        assert_eq!(renderer.generation(), 2);

        renderer.field().unwrap();
        assert_eq!(renderer.generation(), 2);
    }

    #[test]
    fn unchanged_inputs_do_not_invalidate() {
        let mut renderer =
            FieldRenderer::new(Box::new(LookupRasterizer::default()), 10, 10, 0.4).unwrap();
        assert!(!renderer.resize(10, 10).unwrap());
        assert!(!renderer.set_saturation(0.4));
        assert!(!renderer.is_stale());
    }

    #[test]
    fn resize_to_zero_fails_and_keeps_field() {
        let mut renderer =
            FieldRenderer::new(Box::new(SoftwareRasterizer::default()), 10, 10, 1.0).unwrap();
        assert!(renderer.resize(0, 10).is_err());
        assert_eq!(renderer.size(), (10, 10));
        assert!(!renderer.is_stale());
    }

    #[test]
    fn release_drops_buffer_until_next_access() {
        let mut renderer =
            FieldRenderer::new(Box::new(SoftwareRasterizer::default()), 4, 4, 1.0).unwrap();
        renderer.release();
        assert!(renderer.is_stale());
        renderer.sample(0.5, 0.5).unwrap();
        assert!(!renderer.is_stale());
        assert_eq!(renderer.generation(), 2);
    }
}
