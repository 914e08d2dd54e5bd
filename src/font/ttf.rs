//! TTF font rendering via ab_glyph.
//!
//! Renders text to an anti-aliased coverage buffer. Glyph positions come
//! from the same advance sum that [`TtfFace::measure`] reports.

use ab_glyph::{Font, FontArc, ScaleFont};
use std::fmt;
use std::ops::Range;

use super::GlyphRun;
use crate::error::VersecardError;

#[derive(Clone)]
pub struct TtfFace {
    font: FontArc,
}

impl fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfFace")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TtfFace {
    pub fn from_vec(data: Vec<u8>) -> Result<Self, VersecardError> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| VersecardError::Font(format!("Failed to parse font: {}", e)))?;
        Ok(Self { font })
    }

    /// Sum of horizontal advances; no kerning, matching [`Self::rasterize`].
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(px);
        text.chars()
            .map(|ch| scaled.h_advance(self.font.glyph_id(ch)))
            .sum()
    }

    pub fn rasterize(&self, text: &str, px: f32) -> GlyphRun {
        self.rasterize_clipped(text, px, f32::NEG_INFINITY..f32::INFINITY)
    }

    /// Rasterize only the columns whose pen position falls in `visible`.
    pub fn rasterize_clipped(&self, text: &str, px: f32, visible: Range<f32>) -> GlyphRun {
        let scaled = self.font.as_scaled(px);

        // Line height from font metrics
        let ascent = scaled.ascent();
        let descent = scaled.descent();
        let height = ((ascent - descent).ceil() as usize).max(1);

        if text.is_empty() {
            return GlyphRun::empty(height);
        }

        let advance = self.measure(text, px);

        // Side bearings and italic overhang can ink outside [0, advance].
        let pad_x = (px * 0.25).ceil();
        let full_width = (advance + 2.0 * pad_x).ceil();
        let lo = (visible.start + pad_x).floor().clamp(0.0, full_width) as usize;
        let hi = (visible.end + pad_x).ceil().clamp(0.0, full_width) as usize;
        let width = hi.saturating_sub(lo);
        let mut coverage = vec![0.0f32; width * height];

        let mut caret_x = 0.0f32;
        for ch in text.chars() {
            let glyph_id = self.font.glyph_id(ch);
            let glyph_x = caret_x;
            caret_x += scaled.h_advance(glyph_id);

            // Buffer columns this glyph can touch, padding included
            if caret_x + 2.0 * pad_x < lo as f32 {
                continue;
            }
            if glyph_x >= hi as f32 {
                break;
            }

            let glyph = glyph_id.with_scale_and_position(px, ab_glyph::point(glyph_x + pad_x, ascent));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, c| {
                    let x = gx as i64 + bounds.min.x as i64;
                    let y = gy as i64 + bounds.min.y as i64;

                    if x >= lo as i64 && x < hi as i64 && y >= 0 && y < height as i64 {
                        let idx = y as usize * width + (x as usize - lo);
                        coverage[idx] = (coverage[idx] + c).min(1.0);
                    }
                });
            }
        }

        GlyphRun {
            width,
            height,
            coverage,
            advance,
            pad_x: pad_x - lo as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_face() -> Option<TtfFace> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
        .iter()
        .find_map(|p| std::fs::read(p).ok())
        .and_then(|data| TtfFace::from_vec(data).ok())
    }

    #[test]
    fn test_render_basic_text() {
        let Some(face) = system_face() else { return };
        let run = face.rasterize("Hello", 48.0);
        assert!(run.width > 0);
        assert_eq!(run.coverage.len(), run.width * run.height);
        assert!(run.coverage.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_measure_equals_run_advance() {
        let Some(face) = system_face() else { return };
        let text = "Be still, and know";
        assert_eq!(face.measure(text, 68.0), face.rasterize(text, 68.0).advance);
    }

    #[test]
    fn test_long_word_allocates_visible_columns_only() {
        let Some(face) = system_face() else { return };
        let word = "m".repeat(20_000);
        let run = face.rasterize_clipped(&word, 68.0, 5_000.0..6_080.0);
        assert!(run.width <= 1081);
        assert_eq!(run.coverage.len(), run.width * run.height);
        assert!(run.coverage.iter().any(|&v| v > 0.0));
        assert_eq!(run.advance, face.measure(&word, 68.0));
    }

    #[test]
    fn test_anti_aliased_output() {
        let Some(face) = system_face() else { return };
        let run = face.rasterize("Smooth", 48.0);
        assert!(run.coverage.iter().any(|&v| v > 0.01 && v < 0.99));
    }
}
