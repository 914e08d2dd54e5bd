//! # Color Utility
//!
//! Hex color parsing and alpha handling for the compositor.
//!
//! Colors arrive as user-editable hex strings (`#RGB`, `#RRGGBB` or
//! `#RRGGBBAA`). Malformed strings are a caller contract violation: they
//! resolve to opaque black instead of failing the render.

use image::Rgba;
use std::fmt;

/// An sRGB color with straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse a hex color. Returns `None` for anything that isn't 3, 6 or 8
    /// hex digits (with or without the leading `#`).
    pub fn parse_hex(hex: &str) -> Option<Color> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(Color::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Color::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            8 => Some(Color {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
                a: channel(&digits[6..8])? as f32 / 255.0,
            }),
            _ => None,
        }
    }

    /// Lossy parse: malformed input paints as opaque black.
    pub fn from_hex(hex: &str) -> Color {
        Self::parse_hex(hex).unwrap_or(Color::BLACK)
    }

    /// Same color, alpha replaced (clamped to `[0, 1]`).
    pub fn with_alpha(self, alpha: f32) -> Color {
        Color {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to an 8-bit RGBA pixel.
    pub fn to_rgba8(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, (self.a * 255.0).round() as u8])
    }

    /// Canonical `#RRGGBB` form (alpha dropped).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Convert a hex color plus a separate opacity into a blended color.
///
/// The opacity replaces whatever alpha the hex string carried.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Color {
    Color::from_hex(hex).with_alpha(alpha)
}

/// Append a two-digit alpha channel to a hex color (`"#1B4332"` + `"CC"`).
///
/// Short `#RGB` input is expanded first so the result stays parseable.
pub fn with_alpha_suffix(hex: &str, suffix: &str) -> String {
    match Color::parse_hex(hex) {
        Some(c) => format!("{}{}", c.to_hex(), suffix),
        None => format!("{}{}", hex.trim(), suffix),
    }
}
