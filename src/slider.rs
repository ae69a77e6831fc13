//! Horizontal 0.0–1.0 slider for one picker axis.
//!
//! The track is a rasterized gradient of the unmasked field color along the
//! slider's axis, with the other two axes held at the current state. Arrow
//! keys move the value by [`constants::SLIDER_STEP`].

use std::sync::Arc;

use floem::kurbo::{Circle, Rect};
use floem::peniko::{self, Blob, Color};

use floem::keyboard::{Key, NamedKey};
use floem::reactive::{RwSignal, SignalGet, create_effect};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::color::Rgb;
use crate::constants;
use crate::contrast;
use crate::controller::{Axis, GraphicsState};

/// Track color at position `t` for `axis`, other axes taken from `state`.
fn track_color(axis: Axis, state: &GraphicsState, t: f64) -> Rgb {
    let [r, g, b] = match axis {
        Axis::Hue => contrast::field_rgb(t, 1.0, 1.0),
        Axis::Saturation => contrast::field_rgb(state.hue, t, state.lightness.max(0.5)),
        Axis::Lightness => contrast::field_rgb(state.hue, state.saturation, t),
    };
    Rgb::from_unit(r, g, b)
}

/// Rasterize a horizontal gradient: position 0.0 on the left, 1.0 on the right.
fn rasterize_track(width: u32, height: u32, color_at: impl Fn(f64) -> Rgb) -> Vec<u8> {
    let mut buf = vec![0u8; (width * height * 4) as usize];
    for px in 0..width {
        let t = px as f64 / (width - 1).max(1) as f64;
        let c = color_at(t);
        for py in 0..height {
            let offset = ((py * width + px) * 4) as usize;
            buf[offset] = c.r;
            buf[offset + 1] = c.g;
            buf[offset + 2] = c.b;
            buf[offset + 3] = 255;
        }
    }
    buf
}

enum SliderUpdate {
    State(GraphicsState),
}

pub(crate) struct ZeroToOneSlider {
    id: ViewId,
    axis: Axis,
    held: bool,
    state: GraphicsState,
    size: floem::taffy::prelude::Size<f32>,
    on_change: Box<dyn Fn(f64)>,
    /// Cached gradient image.
    track_img: Option<peniko::Image>,
    track_hash: Vec<u8>,
    cached_ends: (Rgb, Rgb, Rgb),
    cached_dims: (u32, u32),
}

/// Creates a slider bound to `axis` of `state`.
///
/// `on_change` receives the new value; the slider itself only follows
/// `state`, so the value shown is always what the picker accepted.
pub(crate) fn zero_to_one_slider(
    axis: Axis,
    state: RwSignal<GraphicsState>,
    on_change: impl Fn(f64) + 'static,
) -> ZeroToOneSlider {
    let id = ViewId::new();

    create_effect(move |_| {
        let s = state.get();
        id.update_state(SliderUpdate::State(s));
    });

    ZeroToOneSlider {
        id,
        axis,
        held: false,
        state: state.get_untracked(),
        size: Default::default(),
        on_change: Box::new(on_change),
        track_img: None,
        track_hash: Vec::new(),
        cached_ends: Default::default(),
        cached_dims: (0, 0),
    }
    .keyboard_navigable()
    .style(|s| {
        s.height(constants::SLIDER_HEIGHT)
            .border_radius(constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl ZeroToOneSlider {
    fn value(&self) -> f64 {
        self.state.get(self.axis)
    }

    fn set_value(&mut self, value: f64) {
        let value = value.clamp(0.0, 1.0);
        (self.on_change)(value);
        self.id.request_layout();
    }

    fn update_from_pointer(&mut self, x: f64) {
        let w = self.size.width as f64;
        let r = constants::THUMB_RADIUS;
        let usable = w - 2.0 * r;
        if usable > 0.0 {
            self.set_value((x - r) / usable);
        }
    }

    fn ensure_track_image(&mut self, scale: f64) {
        let s = scale.max(1.0);
        let pw = (self.size.width as f64 * s).round() as u32;
        let ph = (self.size.height as f64 * s).round() as u32;
        if pw == 0 || ph == 0 {
            return;
        }

        // Every track is smooth between its ends and midpoint, so those
        // three colors identify it.
        let ends = (
            track_color(self.axis, &self.state, 0.0),
            track_color(self.axis, &self.state, 0.5),
            track_color(self.axis, &self.state, 1.0),
        );
        let dims = (pw, ph);
        if self.track_img.is_some() && self.cached_dims == dims && self.cached_ends == ends {
            return;
        }

        let (axis, state) = (self.axis, self.state);
        let pixels = rasterize_track(pw, ph, |t| track_color(axis, &state, t));
        let blob = Blob::new(Arc::new(pixels));
        let img = peniko::Image::new(blob.clone(), peniko::Format::Rgba8, pw, ph);

        let id = blob.id();
        self.track_hash = id.to_le_bytes().to_vec();
        self.track_img = Some(img);
        self.cached_ends = ends;
        self.cached_dims = dims;
    }
}

impl View for ZeroToOneSlider {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<SliderUpdate>() {
            match *update {
                SliderUpdate::State(s) => self.state = s,
            }
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                self.update_from_pointer(e.pos.x);
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    self.update_from_pointer(e.pos.x);
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::FocusLost => {
                self.held = false;
                EventPropagation::Continue
            }
            Event::KeyDown(ke) => {
                let step = constants::SLIDER_STEP;
                let target = match ke.key.logical_key {
                    Key::Named(NamedKey::ArrowLeft) | Key::Named(NamedKey::ArrowDown) => {
                        self.value() - step
                    }
                    Key::Named(NamedKey::ArrowRight) | Key::Named(NamedKey::ArrowUp) => {
                        self.value() + step
                    }
                    Key::Named(NamedKey::Home) => 0.0,
                    Key::Named(NamedKey::End) => 1.0,
                    _ => return EventPropagation::Continue,
                };
                self.set_value(target);
                EventPropagation::Stop
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        if w == 0.0 || h == 0.0 {
            return;
        }
        let rect = Rect::new(0.0, 0.0, w, h);
        let rrect = rect.to_rounded_rect(constants::THUMB_RADIUS);

        cx.save();
        cx.clip(&rrect);
        let scale = cx.scale();
        self.ensure_track_image(scale);
        if let Some(ref img) = self.track_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.track_hash,
                },
                rect,
            );
        }
        cx.restore();

        // Track outline
        cx.stroke(
            &rrect,
            Color::rgba8(0, 0, 0, 40),
            &floem::kurbo::Stroke::new(1.0),
        );

        // Thumb (circular ring; left = 0.0, right = 1.0)
        let radius = constants::THUMB_RADIUS;
        let thumb_x = radius + self.value() * (w - 2.0 * radius);
        let thumb_cy = h / 2.0;
        let circle = Circle::new((thumb_x, thumb_cy), radius);
        cx.stroke(
            &circle,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
        let inner = Circle::new((thumb_x, thumb_cy), radius - 1.5);
        cx.stroke(&inner, Color::WHITE, &floem::kurbo::Stroke::new(2.0));
        let innermost = Circle::new((thumb_x, thumb_cy), radius - 3.0);
        cx.stroke(
            &innermost,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}
