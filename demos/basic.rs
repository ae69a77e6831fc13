//! Standalone demo: opens a window with the contrast-safe picker.
//!
//! Run with `RUST_LOG=floem_contrast_picker=debug` to watch field renders.

use floem::prelude::*;
use floem::window::WindowConfig;
use floem_contrast_picker::{contrast_safe_picker, HexColor, PickerError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), PickerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let color = RwSignal::new(HexColor::parse("#1d4ed8")?);

    floem::Application::new()
        .window(
            move |_| {
                match contrast_safe_picker(color, |c| tracing::info!(%c, "picked")) {
                    Ok(picker) => picker
                        .on_event_stop(floem::event::EventListener::WindowClosed, |_| {
                            floem::quit_app()
                        })
                        .into_any(),
                    Err(err) => label(move || format!("picker unavailable: {err}")).into_any(),
                }
            },
            Some(
                WindowConfig::default()
                    .size((280.0, 520.0))
                    .title("floem-contrast-picker"),
            ),
        )
        .run();
    Ok(())
}
