use std::cell::RefCell;
use std::rc::Rc;

use floem_contrast_picker::contrast::{self, FieldProgram};
use floem_contrast_picker::controller::ClientRect;
use floem_contrast_picker::field::{hue_at_column, lightness_at_row, Viewport};
use floem_contrast_picker::sampler::{pixel_coords, sample};
use floem_contrast_picker::{
    Axis, FieldStrategy, HexColor, LookupRasterizer, PickerController, Rgb, SoftwareRasterizer,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const BLACK: Rgb = Rgb::new(0, 0, 0);

fn channels_within_one(a: Rgb, b: Rgb) -> bool {
    let close = |x: u8, y: u8| x.abs_diff(y) <= 1;
    close(a.r, b.r) && close(a.g, b.g) && close(a.b, b.b)
}

#[test]
fn saturated_field_is_masked() {
    let field = SoftwareRasterizer::default().render(96, 64, 1.0).unwrap();
    let program = FieldProgram::default();
    let mut passing = 0;
    for y in 0..field.height() {
        for x in 0..field.width() {
            let rgb = field.pixel(x, y);
            if rgb == BLACK {
                continue;
            }
            passing += 1;
            assert!(program.contrast_against_text(rgb) >= 4.5, "{rgb:?} at ({x}, {y})");
        }
    }
    // Both dark (passing) and bright (masked) regions exist.
    assert!(passing > 0);
    assert!(passing < field.width() * field.height());
}

#[test]
fn sampler_matches_evaluate_at_named_points() {
    let (w, h) = (200, 200);
    for (hue, saturation, lightness) in [(0.0, 0.0, 0.0), (1.0, 1.0, 1.0), (0.5, 0.5, 0.5)] {
        let field = SoftwareRasterizer::default().render(w, h, saturation).unwrap();
        let sampled = sample(&field, hue, lightness).to_rgb();
        let expected = contrast::evaluate(hue, saturation, lightness).rgb;
        assert!(
            channels_within_one(sampled, expected),
            "({hue}, {saturation}, {lightness}): {sampled:?} vs {expected:?}"
        );
    }
}

#[test]
fn click_then_saturation_change_notifies_twice() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut controller = PickerController::with_viewport(
        "#ff0080",
        Viewport::new(100.0, 100.0, 2.0),
        Box::new(LookupRasterizer::default()),
        move |c: &HexColor| sink.borrow_mut().push(c.clone()),
    )
    .unwrap();
    seen.borrow_mut().clear();

    let rect = ClientRect::new(0.0, 0.0, 100.0, 100.0);
    controller.on_pointer_click(25.0, 75.0, rect).unwrap();
    controller.on_slider_change(Axis::Saturation, 0.6).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0], seen[1]);
}

proptest! {
    #[test]
    fn masking_is_all_or_nothing(
        hue in 0.0f64..=1.0,
        saturation in 0.0f64..=1.0,
        lightness in 0.0f64..=1.0,
    ) {
        let eval = contrast::evaluate(hue, saturation, lightness);
        if eval.passes {
            prop_assert!(eval.ratio >= 4.5);
            let [r, g, b] = contrast::field_rgb(hue, saturation, lightness);
            prop_assert_eq!(eval.rgb, Rgb::from_unit(r, g, b));
        } else {
            prop_assert_eq!(eval.rgb, BLACK);
        }
    }

    #[test]
    fn sampler_agrees_with_field_on_pixel_grid(
        w in 1u32..64,
        h in 1u32..64,
        saturation in 0.0f64..=1.0,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let x = ((fx * w as f64) as u32).min(w - 1);
        let y = ((fy * h as f64) as u32).min(h - 1);
        let hue = hue_at_column(x, w);
        let lightness = lightness_at_row(y, h);

        let field = SoftwareRasterizer::default().render(w, h, saturation).unwrap();
        prop_assert_eq!(pixel_coords(w, h, hue, lightness), (x, y));
        let expected = contrast::evaluate(hue, saturation, lightness).rgb;
        prop_assert_eq!(sample(&field, hue, lightness), expected.to_hex());
    }

    #[test]
    fn lookup_and_software_agree(
        w in 1u32..48,
        h in 1u32..48,
        saturation in 0.0f64..=1.0,
    ) {
        let software = SoftwareRasterizer::default().render(w, h, saturation).unwrap();
        let lookup = LookupRasterizer::default().render(w, h, saturation).unwrap();
        prop_assert_eq!(software, lookup);
    }
}

// Each case renders a full field, so keep the case count down.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn click_height_maps_to_inverted_lightness(
        fy in 0.0f64..=1.0,
        display_height in 10.0f64..200.0,
        scale in 1.0f64..2.0,
    ) {
        let mut controller = PickerController::with_viewport(
            "#202020",
            Viewport::new(120.0, display_height, scale),
            Box::new(SoftwareRasterizer::default()),
            |_: &HexColor| {},
        )
        .unwrap();
        let rect = ClientRect::new(5.0, 7.0, 120.0, display_height);
        controller.on_pointer_click(65.0, 7.0 + fy * display_height, rect).unwrap();
        prop_assert!((controller.state().lightness - (1.0 - fy)).abs() < 1e-9);
    }

    #[test]
    fn chosen_color_is_always_readable_or_black(
        hue in 0.0f64..=1.0,
        saturation in 0.0f64..=1.0,
        lightness in 0.0f64..=1.0,
    ) {
        let mut controller = PickerController::new(
            "#336699",
            Box::new(LookupRasterizer::default()),
            |_: &HexColor| {},
        )
        .unwrap();
        controller.on_slider_change(Axis::Saturation, saturation).unwrap();
        controller.on_slider_change(Axis::Hue, hue).unwrap();
        controller.on_slider_change(Axis::Lightness, lightness).unwrap();
        let rgb = controller.chosen().to_rgb();
        prop_assert!(
            rgb == BLACK || FieldProgram::default().contrast_against_text(rgb) >= 4.5,
            "{:?}",
            rgb
        );
    }
}
