//! Picked color output and the copy button.

use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet};

use crate::color::{HexColor, Rgb};
use crate::constants;

fn to_floem(rgb: Rgb) -> Color {
    Color::rgb8(rgb.r, rgb.g, rgb.b)
}

/// Read-only display of the chosen color: white text on the color itself,
/// which is exactly the pairing the field guarantees to be readable.
pub(crate) fn picked_color_output(chosen: RwSignal<HexColor>) -> impl IntoView {
    h_stack((
        label(|| "Picked colour").style(|s| {
            s.font_size(constants::LABEL_FONT)
                .color(Color::rgb8(120, 120, 120))
        }),
        label(move || chosen.get().to_string()).style(move |s| {
            let c = chosen.get();
            s.width(constants::OUTPUT_WIDTH)
                .padding(4.0)
                .font_size(constants::OUTPUT_FONT)
                .font_family("monospace".to_string())
                .color(to_floem(constants::TEXT_COLOR))
                .background(to_floem(c.to_rgb()))
                .border(1.0)
                .border_color(Color::rgb8(180, 180, 180))
                .border_radius(constants::RADIUS)
        }),
    ))
    .style(|s| s.items_center().gap(constants::GAP))
}

/// Lucide copy glyph that puts the chosen color's hex on the clipboard.
#[cfg(feature = "clipboard")]
pub(crate) fn copy_button(chosen: RwSignal<HexColor>) -> impl IntoView {
    let glyph = lucide_icons::Icon::Copy.unicode().to_string();
    container(label(move || glyph.clone()).style(|s| {
        s.font_size(14.0)
            .font_family("lucide".to_string())
            .color(Color::rgb8(120, 120, 120))
            .active(|s| s.color(Color::rgb8(60, 60, 60)))
    }))
    .style(|s| {
        s.size(22.0, 22.0)
            .items_center()
            .justify_center()
            .border_radius(constants::RADIUS)
            .cursor(floem::style::CursorStyle::Pointer)
            .hover(|s| s.background(Color::rgb8(228, 228, 228)))
    })
    .on_click_stop(move |_| copy_to_clipboard(chosen.get_untracked().as_str()))
}

#[cfg(feature = "clipboard")]
fn copy_to_clipboard(hex: &str) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(hex)) {
        Ok(()) => tracing::debug!(hex, "copied picked color"),
        Err(err) => tracing::warn!(%err, "could not copy to clipboard"),
    }
}
