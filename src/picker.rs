//! Picker panel: saturation slider, contrast field, hue and lightness
//! sliders, and the picked color output.

use std::cell::RefCell;
use std::rc::Rc;

use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate, create_effect};
use tracing::error;

use crate::color::HexColor;
use crate::constants;
use crate::controller::{Axis, GraphicsState, PickerController};
use crate::error::PickerError;
use crate::field::{LookupRasterizer, Viewport};
use crate::field_view::contrast_field;
#[cfg(feature = "clipboard")]
use crate::inputs::copy_button;
use crate::inputs::picked_color_output;
use crate::slider::zero_to_one_slider;

/// Shared access to the controller from views and effects.
///
/// The controller's listener only records the new color; it is published
/// to signals and the host callback after the controller borrow has ended,
/// so a host that writes the color straight back cannot re-enter it.
#[derive(Clone)]
pub(crate) struct PickerHandle {
    pub(crate) controller: Rc<RefCell<PickerController>>,
    pub(crate) state: RwSignal<GraphicsState>,
    chosen: RwSignal<HexColor>,
    pending: Rc<RefCell<Option<HexColor>>>,
    on_change_color: Rc<dyn Fn(&HexColor)>,
}

impl PickerHandle {
    /// Run one controller transition, then publish its effects.
    pub(crate) fn apply(
        &self,
        transition: impl FnOnce(&mut PickerController) -> Result<Option<HexColor>, PickerError>,
    ) {
        let result = transition(&mut *self.controller.borrow_mut());
        if let Err(err) = result {
            error!(%err, "picker transition failed");
        }
        self.publish();
    }

    /// Feed a new display size to the controller and publish any color
    /// change it causes.
    pub(crate) fn resize(&self, viewport: Viewport) -> Result<bool, PickerError> {
        let result = self.controller.borrow_mut().on_resize(viewport);
        self.publish();
        result
    }

    fn publish(&self) {
        let next = self.controller.borrow().state();
        if self.state.get_untracked() != next {
            self.state.set(next);
        }
        let pending = self.pending.borrow_mut().take();
        if let Some(color) = pending {
            self.chosen.set(color.clone());
            (self.on_change_color)(&color);
        }
    }
}

/// Whether an inbound write is the host handing our own notification back.
///
/// An echo changes the inbound value to the chosen color. Writing the same
/// value again is a deliberate reset and goes through.
fn is_echo(next: &HexColor, prev: &HexColor, chosen: &HexColor) -> bool {
    next == chosen && next != prev
}

fn slider_row(axis: Axis, handle: PickerHandle) -> impl IntoView {
    let state = handle.state;
    v_stack((
        label(move || axis.label()).style(|s| {
            s.font_size(constants::LABEL_FONT)
                .color(Color::rgb8(120, 120, 120))
        }),
        zero_to_one_slider(axis, state, move |value| {
            handle.apply(|controller| controller.on_slider_change(axis, value));
        }),
    ))
    .style(|s| s.gap(2.0).margin_horiz(8.0))
}

/// Builds the picker panel.
///
/// `color` is the inbound color: its value when the picker is built seeds
/// the state, and later writes replace the state. A write that changes
/// `color` to the currently picked color is taken as the host echoing
/// `on_change_color` and is skipped. `on_change_color` fires whenever the
/// picked color changes, never twice in a row with the same value.
pub(crate) fn picker(
    color: RwSignal<HexColor>,
    on_change_color: impl Fn(&HexColor) + 'static,
) -> Result<impl IntoView, PickerError> {
    let pending = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&pending);
    let controller = PickerController::new(
        color.get_untracked().as_str(),
        Box::new(LookupRasterizer::default()),
        move |c: &HexColor| {
            *sink.borrow_mut() = Some(c.clone());
        },
    )?;

    let handle = PickerHandle {
        state: RwSignal::new(controller.state()),
        chosen: RwSignal::new(controller.chosen().clone()),
        controller: Rc::new(RefCell::new(controller)),
        pending,
        on_change_color: Rc::new(on_change_color),
    };
    // Deliver the notification from construction, if any.
    handle.publish();

    // External color -> state
    let external = handle.clone();
    create_effect(move |prev: Option<HexColor>| {
        let next = color.get();
        let Some(prev) = prev else {
            return next;
        };
        if !is_echo(&next, &prev, &external.chosen.get_untracked()) {
            external.apply(|controller| controller.on_external_color_change(next.as_str()));
        }
        next
    });

    let chosen = handle.chosen;
    Ok(v_stack((
        label(|| "Pick a colour. Only colours readable under white text are shown.").style(
            |s| {
                s.font_size(constants::LABEL_FONT)
                    .color(Color::rgb8(90, 90, 90))
                    .margin_horiz(8.0)
            },
        ),
        slider_row(Axis::Saturation, handle.clone()),
        contrast_field(handle.clone()).style(|s| s.margin_horiz(8.0)),
        slider_row(Axis::Hue, handle.clone()),
        slider_row(Axis::Lightness, handle),
        h_stack((
            picked_color_output(chosen),
            #[cfg(feature = "clipboard")]
            copy_button(chosen),
        ))
        .style(|s| {
            s.gap(constants::GAP)
                .items_center()
                .justify_center()
        }),
    ))
    .style(|s| {
        s.gap(constants::GAP)
            .padding_horiz(constants::PADDING)
            .padding_bottom(constants::PADDING)
            .padding_top(constants::PADDING)
            .size_full()
            .justify_center()
            .background(Color::rgb8(242, 242, 242))
    }))
}
