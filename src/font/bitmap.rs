//! Built-in bitmap face.
//!
//! Uses the Spleen 12×24 PSF2 font, scaled nearest-neighbour to the
//! requested pixel height. Every character advances `px / 2`, so measurement
//! is exact and independent of the glyph shapes.

use spleen_font::{PSF2Font, FONT_12X24};
use std::ops::Range;

use super::GlyphRun;

const CELL_WIDTH: usize = 12;
const CELL_HEIGHT: usize = 24;

#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFace;

impl BitmapFace {
    fn scale(px: f32) -> f32 {
        px / CELL_HEIGHT as f32
    }

    pub fn measure(&self, text: &str, px: f32) -> f32 {
        text.chars().count() as f32 * CELL_WIDTH as f32 * Self::scale(px)
    }

    pub fn rasterize(&self, text: &str, px: f32) -> GlyphRun {
        self.rasterize_clipped(text, px, f32::NEG_INFINITY..f32::INFINITY)
    }

    /// Rasterize only the columns whose pen position falls in `visible`.
    pub fn rasterize_clipped(&self, text: &str, px: f32, visible: Range<f32>) -> GlyphRun {
        let scale = Self::scale(px);
        let height = (px.ceil() as usize).max(1);
        let advance = self.measure(text, px);
        if text.is_empty() || scale <= 0.0 {
            return GlyphRun::empty(height);
        }

        let full_width = advance.ceil();
        let lo = visible.start.floor().clamp(0.0, full_width) as usize;
        let hi = visible.end.ceil().clamp(0.0, full_width) as usize;
        let width = hi.saturating_sub(lo);
        let mut coverage = vec![0.0f32; width * height];
        let mut spleen = PSF2Font::new(FONT_12X24).ok();
        let cell_advance = CELL_WIDTH as f32 * scale;

        for (i, ch) in text.chars().enumerate() {
            let x0 = i as f32 * cell_advance;
            let x_start = (x0.floor() as usize).max(lo);
            let x_end = ((x0 + cell_advance).ceil() as usize).min(hi);
            if x_start >= x_end {
                if x0 >= hi as f32 {
                    break;
                }
                continue;
            }

            let bits = match spleen.as_mut() {
                Some(font) => glyph_bits(font, ch),
                None => box_bits(),
            };

            for dy in 0..height {
                let sy = (dy as f32 / scale) as usize;
                if sy >= CELL_HEIGHT {
                    continue;
                }
                for dx in x_start..x_end {
                    let local = dx as f32 + 0.5 - x0;
                    if local < 0.0 {
                        continue;
                    }
                    let sx = (local / scale) as usize;
                    if sx < CELL_WIDTH && bits[sy * CELL_WIDTH + sx] {
                        coverage[dy * width + dx - lo] = 1.0;
                    }
                }
            }
        }

        GlyphRun {
            width,
            height,
            coverage,
            advance,
            pad_x: -(lo as f32),
        }
    }
}

/// Collect the 12×24 bitmap for a character, or a box outline when Spleen
/// has no glyph for it.
fn glyph_bits(font: &mut PSF2Font, ch: char) -> Vec<bool> {
    let mut bits = vec![false; CELL_WIDTH * CELL_HEIGHT];
    let utf8 = ch.to_string();

    match font.glyph_for_utf8(utf8.as_bytes()) {
        Some(glyph) => {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < CELL_HEIGHT && col_x < CELL_WIDTH {
                        bits[row_y * CELL_WIDTH + col_x] = on;
                    }
                }
            }
            bits
        }
        None => box_bits(),
    }
}

fn box_bits() -> Vec<bool> {
    let mut bits = vec![false; CELL_WIDTH * CELL_HEIGHT];
    for x in 1..CELL_WIDTH - 1 {
        bits[2 * CELL_WIDTH + x] = true;
        bits[(CELL_HEIGHT - 3) * CELL_WIDTH + x] = true;
    }
    for y in 2..CELL_HEIGHT - 2 {
        bits[y * CELL_WIDTH + 1] = true;
        bits[y * CELL_WIDTH + CELL_WIDTH - 2] = true;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_is_half_px_per_char() {
        assert_eq!(BitmapFace.measure("abcd", 48.0), 96.0);
        assert_eq!(BitmapFace.measure("", 48.0), 0.0);
        // Counted in chars, not bytes
        assert_eq!(BitmapFace.measure("été", 24.0), 36.0);
    }

    #[test]
    fn test_rasterize_dimensions() {
        let run = BitmapFace.rasterize("Hello", 72.0);
        assert_eq!(run.height, 72);
        assert_eq!(run.width, 180);
        assert_eq!(run.coverage.len(), run.width * run.height);
        assert!(run.coverage.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_clipped_matches_full_columns() {
        let full = BitmapFace.rasterize("Hello", 72.0);
        let clipped = BitmapFace.rasterize_clipped("Hello", 72.0, 36.0..108.0);
        assert_eq!(clipped.width, 72);
        assert_eq!(clipped.pad_x, -36.0);
        assert_eq!(clipped.advance, full.advance);
        for y in 0..full.height {
            assert_eq!(
                &clipped.coverage[y * 72..(y + 1) * 72],
                &full.coverage[y * full.width + 36..y * full.width + 108]
            );
        }
    }

    #[test]
    fn test_long_word_allocates_visible_columns_only() {
        let word = "a".repeat(20_000);
        let run = BitmapFace.rasterize_clipped(&word, 68.0, 339_460.0..340_540.0);
        assert_eq!(run.advance, 680_000.0);
        assert_eq!(run.width, 1080);
        assert_eq!(run.coverage.len(), 1080 * 68);
        assert!(run.coverage.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_space_is_blank() {
        let run = BitmapFace.rasterize("   ", 24.0);
        assert!(run.coverage.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unknown_glyph_draws_box() {
        let run = BitmapFace.rasterize("\u{10FFFD}", 24.0);
        assert!(run.coverage.iter().any(|&v| v > 0.0));
    }
}
