//! Color types and conversions between hex, RGB and HSL.
//!
//! RGB channels are 8-bit integers. HSL components are normalized to
//! 0.0–1.0 (not degrees or percent). Hex strings are `#RRGGBB`, accepted in
//! either case and always produced in lowercase.

use std::fmt;
use std::str::FromStr;

use crate::error::PickerError;

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quantize normalized channels (0.0–1.0) to 8 bits, rounding to nearest.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: unit_to_u8(r),
            g: unit_to_u8(g),
            b: unit_to_u8(b),
        }
    }

    /// Channels as normalized f64 (0.0–1.0).
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    /// Parse `#RRGGBB`. See [`hex_to_rgb`].
    pub fn from_hex(hex: &str) -> Result<Self, PickerError> {
        hex_to_rgb(hex)
    }

    pub fn to_hex(self) -> HexColor {
        rgb_to_hex(self)
    }

    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }
}

fn unit_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// HSL color with every component in 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Canonical `#rrggbb` color string.
///
/// Only constructed through [`HexColor::parse`] or [`rgb_to_hex`], so the
/// inner string is always seven characters of lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `#RGB` or `#RRGGBB` string into canonical form.
    pub fn parse(input: &str) -> Result<Self, PickerError> {
        let rgb = hex_to_rgb(&expand_shorthand(input))?;
        Ok(rgb_to_hex(rgb))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_rgb(&self) -> Rgb {
        // Canonical by construction, so the channels always parse.
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        Rgb::new(channel(1), channel(3), channel(5))
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self("#000000".to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True when `hex` is exactly `#` followed by six hex digits.
pub fn is_valid_hex(hex: &str) -> bool {
    let bytes = hex.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

/// Parse `#RRGGBB` (case-insensitive).
///
/// Shorthand `#RGB` is rejected here; run it through [`expand_shorthand`]
/// first.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, PickerError> {
    if !is_valid_hex(hex) {
        return Err(PickerError::InvalidColorFormat(hex.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| PickerError::InvalidColorFormat(hex.to_string()))
    };
    Ok(Rgb::new(channel(1)?, channel(3)?, channel(5)?))
}

/// Expand `#RGB` to `#RRGGBB` by duplicating each digit.
///
/// Anything that is not `#` plus three characters is returned unchanged.
pub fn expand_shorthand(hex: &str) -> String {
    let mut chars = hex.chars();
    if hex.chars().count() != 4 || chars.next() != Some('#') {
        return hex.to_string();
    }
    let mut out = String::with_capacity(7);
    out.push('#');
    for c in chars {
        out.push(c);
        out.push(c);
    }
    out
}

/// Format as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> HexColor {
    HexColor(format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b))
}

/// RGB → HSL using the min/max channel method.
///
/// Grays (all channels equal) report `h = 0, s = 0`.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let (r, g, b) = rgb.to_unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn hex_to_rgb_parses_channels() {
        assert_eq!(hex_to_rgb("#ff0080"), Ok(Rgb::new(255, 0, 128)));
        assert_eq!(hex_to_rgb("#123ABC"), Ok(Rgb::new(0x12, 0x3a, 0xbc)));
    }

    #[test]
    fn hex_to_rgb_rejects_malformed() {
        for bad in ["#gggggg", "ff0080", "#ff008", "#ff00800", "#f08", "", "#ff 080"] {
            assert_eq!(
                hex_to_rgb(bad),
                Err(PickerError::InvalidColorFormat(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn invalid_hex_message_names_input() {
        let err = hex_to_rgb("#gggggg").unwrap_err();
        assert_eq!(err.to_string(), "invalid hex color: #gggggg");
    }

    #[test]
    fn rgb_to_hex_pads_and_lowercases() {
        assert_eq!(rgb_to_hex(Rgb::new(255, 0, 128)).as_str(), "#ff0080");
        assert_eq!(rgb_to_hex(Rgb::new(10, 16, 255)).as_str(), "#0a10ff");
    }

    #[test]
    fn expand_shorthand_duplicates_digits() {
        assert_eq!(expand_shorthand("#f08"), "#ff0088");
        assert_eq!(expand_shorthand("#123"), "#112233");
        assert_eq!(expand_shorthand("#abcdef"), "#abcdef");
        assert_eq!(expand_shorthand("f080"), "f080");
    }

    #[test]
    fn rgb_to_hsl_magenta_pink() {
        // Red is the max channel and blue > green, so hue wraps to ~330°.
        let hsl = rgb_to_hsl(Rgb::new(255, 0, 128));
        let expected = (6.0 - 128.0 / 255.0) / 6.0;
        assert!((hsl.h - expected).abs() < 1e-12);
        assert_eq!(hsl.s, 1.0);
        assert_eq!(hsl.l, 0.5);
    }

    #[test]
    fn rgb_to_hsl_primaries() {
        let red = rgb_to_hsl(Rgb::new(255, 0, 0));
        assert_eq!((red.h, red.s, red.l), (0.0, 1.0, 0.5));
        let green = rgb_to_hsl(Rgb::new(0, 255, 0));
        assert!((green.h - 1.0 / 3.0).abs() < 1e-12);
        let blue = rgb_to_hsl(Rgb::new(0, 0, 255));
        assert!((blue.h - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rgb_to_hsl_light_colors_use_upper_saturation_branch() {
        let hsl = rgb_to_hsl(Rgb::new(255, 128, 128));
        assert!(hsl.l > 0.5);
        assert!((hsl.s - 1.0).abs() < 1e-9);
        assert_eq!(hsl.h, 0.0);
    }

    #[test]
    fn gray_is_achromatic() {
        let hsl = rgb_to_hsl(Rgb::new(51, 51, 51));
        assert_eq!(hsl, Hsl { h: 0.0, s: 0.0, l: 0.2 });
    }

    #[test]
    fn hex_color_parse_canonicalizes() {
        assert_eq!(HexColor::parse("#F08").unwrap().as_str(), "#ff0088");
        assert_eq!("#ABCDEF".parse::<HexColor>().unwrap().as_str(), "#abcdef");
        assert!(HexColor::parse("#ab").is_err());
    }

    #[test]
    fn hex_color_to_rgb() {
        let hex = HexColor::parse("#0a10ff").unwrap();
        assert_eq!(hex.to_rgb(), Rgb::new(10, 16, 255));
    }

    #[test]
    fn from_unit_rounds_to_nearest() {
        assert_eq!(Rgb::from_unit(0.5, 1.0, 0.0), Rgb::new(128, 255, 0));
        assert_eq!(Rgb::from_unit(-0.1, 1.2, 0.002), Rgb::new(0, 255, 1));
    }
}
