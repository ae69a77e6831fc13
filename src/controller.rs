//! Picker state and the transitions that keep it in sync with the field.
//!
//! [`GraphicsState`] is a plain value. Every change goes through
//! [`apply_update`], and every input event goes through one named transition
//! on [`PickerController`], which re-renders the field only when saturation
//! or size changes, re-samples the chosen color, and notifies the listener only when
//! that color actually changed.

use tracing::{trace, warn};

use crate::color::HexColor;
use crate::error::PickerError;
use crate::field::{FieldRenderer, FieldStrategy, PixelBuffer, Viewport};

/// One of the three slider axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Hue,
    Lightness,
    Saturation,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Hue, Axis::Lightness, Axis::Saturation];

    pub fn label(self) -> &'static str {
        match self {
            Axis::Hue => "Hue",
            Axis::Lightness => "Lightness",
            Axis::Saturation => "Saturation",
        }
    }
}

/// Hue, lightness and saturation, each 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphicsState {
    pub hue: f64,
    pub lightness: f64,
    pub saturation: f64,
}

impl GraphicsState {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Hue => self.hue,
            Axis::Lightness => self.lightness,
            Axis::Saturation => self.saturation,
        }
    }
}

/// Partial update; `None` leaves the axis untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatePatch {
    pub hue: Option<f64>,
    pub lightness: Option<f64>,
    pub saturation: Option<f64>,
}

impl StatePatch {
    pub fn axis(axis: Axis, value: f64) -> Self {
        let mut patch = Self::default();
        match axis {
            Axis::Hue => patch.hue = Some(value),
            Axis::Lightness => patch.lightness = Some(value),
            Axis::Saturation => patch.saturation = Some(value),
        }
        patch
    }

    /// Replace all three axes.
    pub fn full(hue: f64, lightness: f64, saturation: f64) -> Self {
        Self {
            hue: Some(hue),
            lightness: Some(lightness),
            saturation: Some(saturation),
        }
    }
}

fn merge(current: f64, update: Option<f64>) -> f64 {
    match update {
        Some(v) if !v.is_nan() => v.clamp(0.0, 1.0),
        _ => current,
    }
}

/// Apply `patch` to `state`, clamping into [0, 1]. NaN values are ignored.
pub fn apply_update(state: GraphicsState, patch: StatePatch) -> GraphicsState {
    GraphicsState {
        hue: merge(state.hue, patch.hue),
        lightness: merge(state.lightness, patch.lightness),
        saturation: merge(state.saturation, patch.saturation),
    }
}

/// Displayed rectangle of the field, in the same space as pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

type ColorListener = Box<dyn FnMut(&HexColor)>;

/// Owns the picker state and the rendered field.
pub struct PickerController {
    state: GraphicsState,
    renderer: FieldRenderer,
    chosen: HexColor,
    last_notified: HexColor,
    on_change_color: ColorListener,
}

impl PickerController {
    /// Start from `color` with a default-sized field.
    pub fn new(
        color: &str,
        strategy: Box<dyn FieldStrategy>,
        on_change_color: impl FnMut(&HexColor) + 'static,
    ) -> Result<Self, PickerError> {
        Self::with_viewport(color, Viewport::default(), strategy, on_change_color)
    }

    /// Start from `color` with a field sized for `viewport`.
    ///
    /// Fails if `color` is malformed or the field cannot be rendered. The
    /// listener fires right away if the color sampled from the field differs
    /// from `color`.
    pub fn with_viewport(
        color: &str,
        viewport: Viewport,
        strategy: Box<dyn FieldStrategy>,
        on_change_color: impl FnMut(&HexColor) + 'static,
    ) -> Result<Self, PickerError> {
        let initial = HexColor::parse(color)?;
        let state = state_for(&initial);
        let (width, height) = viewport.backing_size()?;
        let renderer = FieldRenderer::new(strategy, width, height, state.saturation)?;
        let mut controller = Self {
            state,
            renderer,
            chosen: initial.clone(),
            last_notified: initial,
            on_change_color: Box::new(on_change_color),
        };
        controller.resample_and_notify()?;
        Ok(controller)
    }

    pub fn state(&self) -> GraphicsState {
        self.state
    }

    /// Color currently under the marker.
    pub fn chosen(&self) -> &HexColor {
        &self.chosen
    }

    /// Backing size of the field in pixels.
    pub fn field_size(&self) -> (u32, u32) {
        self.renderer.size()
    }

    pub fn field_generation(&self) -> u64 {
        self.renderer.generation()
    }

    /// Current field, rendering it first if a resize left it stale.
    pub fn field(&mut self) -> Result<&PixelBuffer, PickerError> {
        self.renderer.field()
    }

    /// A slider moved. Only a saturation change re-renders the field.
    pub fn on_slider_change(
        &mut self,
        axis: Axis,
        value: f64,
    ) -> Result<Option<HexColor>, PickerError> {
        trace!(?axis, value, "slider change");
        self.state = apply_update(self.state, StatePatch::axis(axis, value));
        if axis == Axis::Saturation {
            self.renderer.set_saturation(self.state.saturation);
        }
        self.resample_and_notify()
    }

    /// The field was clicked (or dragged over) at client coordinates.
    ///
    /// The position is scaled from the displayed rectangle into backing
    /// pixels before being normalized, so CSS scaling and device pixel ratio
    /// cancel out. Positions outside the field clamp to its edge.
    pub fn on_pointer_click(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect: ClientRect,
    ) -> Result<Option<HexColor>, PickerError> {
        if !rect.is_usable() {
            warn!(?rect, "ignoring click on a field with no displayed area");
            return Ok(None);
        }
        let (buffer_width, buffer_height) = self.renderer.size();
        let (buffer_width, buffer_height) = (buffer_width as f64, buffer_height as f64);
        let pixel_x = (client_x - rect.left) * buffer_width / rect.width;
        let pixel_y = (client_y - rect.top) * buffer_height / rect.height;
        let hue = pixel_x / buffer_width;
        let lightness = 1.0 - pixel_y / buffer_height;
        trace!(pixel_x, pixel_y, hue, lightness, "pointer click");

        self.state = apply_update(
            self.state,
            StatePatch {
                hue: Some(hue),
                lightness: Some(lightness),
                saturation: None,
            },
        );
        self.resample_and_notify()
    }

    /// The owner supplied a new color; it replaces the whole state.
    pub fn on_external_color_change(
        &mut self,
        color: &str,
    ) -> Result<Option<HexColor>, PickerError> {
        let color = HexColor::parse(color)?;
        trace!(%color, "external color change");
        let target = state_for(&color);
        self.state = apply_update(
            self.state,
            StatePatch::full(target.hue, target.lightness, target.saturation),
        );
        self.renderer.set_saturation(self.state.saturation);
        self.renderer.invalidate();
        self.resample_and_notify()
    }

    /// The displayed size or device scale changed.
    ///
    /// When the backing size changes, the chosen color is re-read from the
    /// field at the new size so it matches the pixel under the marker.
    /// Returns whether the backing size changed.
    pub fn on_resize(&mut self, viewport: Viewport) -> Result<bool, PickerError> {
        let (width, height) = viewport.backing_size()?;
        if !self.renderer.resize(width, height)? {
            return Ok(false);
        }
        trace!(width, height, "field resized");
        self.resample_and_notify()?;
        Ok(true)
    }

    /// Free the field buffer; the next access renders it again.
    pub fn release(&mut self) {
        self.renderer.release();
    }

    fn resample_and_notify(&mut self) -> Result<Option<HexColor>, PickerError> {
        self.chosen = self
            .renderer
            .sample(self.state.hue, self.state.lightness)?;
        if self.chosen == self.last_notified {
            return Ok(None);
        }
        self.last_notified = self.chosen.clone();
        trace!(color = %self.chosen, "chosen color changed");
        (self.on_change_color)(&self.chosen);
        Ok(Some(self.chosen.clone()))
    }
}

fn state_for(color: &HexColor) -> GraphicsState {
    let hsl = color.to_rgb().to_hsl();
    GraphicsState {
        hue: hsl.h,
        lightness: hsl.l,
        saturation: hsl.s,
    }
}
