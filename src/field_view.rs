//! 2D contrast field view.
//!
//! Hue runs left to right and lightness from light (top) to dark (bottom).
//! The controller's field buffer is uploaded as an RGBA8 image only when it
//! has been re-rendered, and drawn scaled to the widget. The marker sits
//! over the current (hue, lightness).

use std::rc::Rc;
use std::sync::Arc;

use floem::kurbo::{Circle, Point, Rect};
use floem::peniko::{self, Blob, Color};

use floem::reactive::{SignalGet, create_effect};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;
use tracing::error;

use crate::constants;
use crate::controller::{ClientRect, GraphicsState};
use crate::error::PickerError;
use crate::field::Viewport;
use crate::picker::PickerHandle;

enum FieldUpdate {
    State(GraphicsState),
}

pub(crate) struct ContrastFieldView {
    id: ViewId,
    held: bool,
    state: GraphicsState,
    size: floem::taffy::prelude::Size<f32>,
    handle: PickerHandle,
    /// Last uploaded field image and the render generation it came from.
    field_img: Option<peniko::Image>,
    field_hash: Vec<u8>,
    field_generation: u64,
    failed: bool,
}

/// Creates the contrast field view driven by `handle`.
pub(crate) fn contrast_field(handle: PickerHandle) -> ContrastFieldView {
    let id = ViewId::new();
    let state = handle.state;

    create_effect(move |_| {
        let s = state.get();
        id.update_state(FieldUpdate::State(s));
    });

    ContrastFieldView {
        id,
        held: false,
        state: state.get_untracked(),
        size: Default::default(),
        handle,
        field_img: None,
        field_hash: Vec::new(),
        field_generation: 0,
        failed: false,
    }
    .style(|s| {
        s.flex_grow(1.0)
            .min_height(constants::FIELD_MIN_HEIGHT)
            .border_radius(constants::RADIUS)
            .cursor(floem::style::CursorStyle::Default)
    })
}

impl ContrastFieldView {
    fn pick_at(&mut self, pos: Point) {
        let rect = ClientRect::new(0.0, 0.0, self.size.width as f64, self.size.height as f64);
        self.handle
            .apply(|controller| controller.on_pointer_click(pos.x, pos.y, rect));
        self.state = self.handle.state.get_untracked();
        self.id.request_layout();
    }

    fn marker_position(&self) -> Point {
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        Point::new(self.state.hue * w, (1.0 - self.state.lightness) * h)
    }

    /// Resize the backing field to the widget and re-upload it if it changed.
    fn ensure_field_image(&mut self, scale: f64) -> Result<(), PickerError> {
        let viewport = Viewport::new(self.size.width as f64, self.size.height as f64, scale);
        self.handle.resize(viewport)?;

        let shared = Rc::clone(&self.handle.controller);
        let mut controller = shared.borrow_mut();
        controller.field()?;
        let generation = controller.field_generation();
        if self.field_img.is_some() && generation == self.field_generation {
            return Ok(());
        }

        let field = controller.field()?;
        let blob = Blob::new(Arc::new(field.as_rgba().to_vec()));
        let img = peniko::Image::new(
            blob.clone(),
            peniko::Format::Rgba8,
            field.width(),
            field.height(),
        );

        self.field_hash = blob.id().to_le_bytes().to_vec();
        self.field_img = Some(img);
        self.field_generation = generation;
        Ok(())
    }
}

impl View for ContrastFieldView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<FieldUpdate>() {
            match *update {
                FieldUpdate::State(s) => self.state = s,
            }
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                self.pick_at(e.pos);
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    self.pick_at(e.pos);
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

        if let Err(err) = self.ensure_field_image(cx.scale()) {
            // Without a field there is nothing safe to offer; stay blank.
            if !self.failed {
                error!(%err, "contrast field unavailable");
                self.failed = true;
            }
            return;
        }
        self.failed = false;

        let rect = Rect::new(0.0, 0.0, w, h);
        let rrect = rect.to_rounded_rect(constants::RADIUS as f64);
        cx.save();
        cx.clip(&rrect);
        if let Some(ref img) = self.field_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.field_hash,
                },
                rect,
            );
        }
        cx.restore();

        // Marker
        let pt = self.marker_position();
        let outer = Circle::new(pt, constants::MARKER_RADIUS + 1.0);
        cx.stroke(
            &outer,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
        let marker = Circle::new(pt, constants::MARKER_RADIUS);
        cx.stroke(&marker, Color::WHITE, &floem::kurbo::Stroke::new(2.0));
        let inner = Circle::new(pt, constants::MARKER_RADIUS - 1.5);
        cx.stroke(
            &inner,
            Color::rgba8(0, 0, 0, 80),
            &floem::kurbo::Stroke::new(1.0),
        );
    }
}

impl Drop for ContrastFieldView {
    fn drop(&mut self) {
        if let Ok(mut controller) = self.handle.controller.try_borrow_mut() {
            controller.release();
        }
    }
}
