//! # floem-contrast-picker
//!
//! A contrast-safe color picker widget for [Floem](https://github.com/lapce/floem).
//!
//! The picker shows a hue × lightness field at a chosen saturation where every
//! color that would not reach 4.5:1 contrast against white text is blacked
//! out, so whatever the user picks is readable under white text (WCAG AA).
//!
//! The color math, the field renderer and the picker state machine are plain
//! Rust and usable without a window; see [`controller::PickerController`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use floem::prelude::*;
//! use floem_contrast_picker::{contrast_safe_picker, HexColor};
//!
//! let color = RwSignal::new(HexColor::parse("#1d4ed8").unwrap());
//! let picker = contrast_safe_picker(color, |c| println!("picked {c}"));
//! // Use `picker?` in your Floem view tree.
//! ```

pub mod color;
pub mod constants;
pub mod contrast;
pub mod controller;
pub mod error;
pub mod field;
pub mod sampler;

mod field_view;
mod inputs;
mod picker;
mod slider;

pub use color::{HexColor, Hsl, Rgb};
pub use controller::{Axis, GraphicsState, PickerController};
pub use error::PickerError;
pub use field::{FieldStrategy, LookupRasterizer, PixelBuffer, SoftwareRasterizer};

use std::sync::Once;

use floem::prelude::*;
use floem::reactive::RwSignal;
use floem::text::FONT_SYSTEM;

static LOAD_LUCIDE_FONT: Once = Once::new();

/// Creates the top-level contrast-safe picker view.
///
/// The picker starts from `color` and follows later writes to it.
/// `on_change_color` is called with every new picked color, and the host may
/// write that color straight back into `color`.
///
/// A write that changes `color` to the color the picker currently shows is
/// treated as such an echo and leaves the state alone. Writing the same
/// value a second time always resets the state to it.
///
/// Fails if `color` cannot be parsed or the field cannot be rendered; the
/// picker never falls back to an unconstrained field.
pub fn contrast_safe_picker(
    color: RwSignal<HexColor>,
    on_change_color: impl Fn(&HexColor) + 'static,
) -> Result<impl IntoView, PickerError> {
    LOAD_LUCIDE_FONT.call_once(|| {
        FONT_SYSTEM
            .lock()
            .db_mut()
            .load_font_data(lucide_icons::LUCIDE_FONT_BYTES.to_vec());
    });
    picker::picker(color, on_change_color)
}
