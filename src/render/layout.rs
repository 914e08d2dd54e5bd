//! # Passage Layout
//!
//! Turns verse text and a reference label into positioned draw-text
//! operations for a surface of a given size.
//!
//! ## Algorithm
//!
//! ```text
//! max_width    = width * 0.8
//! line_height  = font_px * 1.5
//! block_height = lines * line_height
//! start_y      = (height - block_height) / 2
//! line i       → (width / 2, start_y + (i + 0.5) * line_height)
//! reference    → (width / 2, start_y + block_height + 80)
//! ```
//!
//! Positions are the horizontal center and vertical middle of each line.

use crate::color::{with_alpha_suffix, Color};
use crate::font::{FontFace, TextMeasure};
use crate::model::SizePreset;
use crate::render::surface::Surface;

/// Fraction of the surface width a line may occupy.
pub const WRAP_WIDTH_RATIO: f32 = 0.8;
/// Line box height relative to the body font size.
pub const LINE_HEIGHT_RATIO: f32 = 1.5;
/// Gap between the bottom of the verse block and the reference line.
pub const REFERENCE_GAP: f32 = 80.0;
/// Alpha channel appended to the text color for the reference line (≈80%).
pub const REFERENCE_ALPHA_SUFFIX: &str = "CC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Body,
    Reference,
}

/// One line of text to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawText {
    pub content: String,
    /// Horizontal center.
    pub x: f32,
    /// Vertical middle of the line box.
    pub y: f32,
    pub font_px: f32,
    pub role: TextRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassageLayout {
    pub lines: Vec<DrawText>,
    pub reference: Option<DrawText>,
    pub line_height: f32,
    pub block_height: f32,
    pub start_y: f32,
    pub max_line_width: f32,
}

impl PassageLayout {
    /// All draw operations in paint order (body lines, then reference).
    pub fn ops(&self) -> impl Iterator<Item = &DrawText> {
        self.lines.iter().chain(self.reference.iter())
    }
}

/// Greedy word wrap.
///
/// Words are separated by any whitespace. A word that alone exceeds
/// `max_width` is placed on its own line unmodified.
pub fn wrap_words(text: &str, max_width: f32, px: f32, measure: &impl TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if measure.measure(&candidate, px) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay out a passage on a `width × height` surface using the fonts for `size`.
pub fn layout_passage(
    verse_text: &str,
    reference_label: &str,
    width: u32,
    height: u32,
    size: SizePreset,
    measure: &impl TextMeasure,
) -> PassageLayout {
    let width = width as f32;
    let height = height as f32;
    let font_px = size.body_font_px();
    let max_line_width = width * WRAP_WIDTH_RATIO;

    let wrapped = wrap_words(verse_text, max_line_width, font_px, measure);

    let line_height = font_px * LINE_HEIGHT_RATIO;
    let block_height = wrapped.len() as f32 * line_height;
    let start_y = (height - block_height) / 2.0;
    let center_x = width / 2.0;

    let lines = wrapped
        .into_iter()
        .enumerate()
        .map(|(i, content)| DrawText {
            content,
            x: center_x,
            y: start_y + (i as f32 + 0.5) * line_height,
            font_px,
            role: TextRole::Body,
        })
        .collect();

    let reference_label = reference_label.trim();
    let reference = (!reference_label.is_empty()).then(|| DrawText {
        content: reference_label.to_string(),
        x: center_x,
        y: start_y + block_height + REFERENCE_GAP,
        font_px: size.reference_font_px(),
        role: TextRole::Reference,
    });

    PassageLayout {
        lines,
        reference,
        line_height,
        block_height,
        start_y,
        max_line_width,
    }
}

/// Paint a laid-out passage in `text_color` (a hex string).
///
/// The reference line uses the same color with the alpha suffix applied.
pub fn paint_passage(surface: &mut Surface, layout: &PassageLayout, face: &FontFace, text_color: &str) {
    let body = Color::from_hex(text_color);
    let muted = Color::from_hex(&with_alpha_suffix(text_color, REFERENCE_ALPHA_SUFFIX));

    for op in layout.ops() {
        // Only the columns that land on the surface are rasterized
        let pen_x = op.x - face.measure(&op.content, op.font_px) / 2.0;
        let visible = -pen_x..surface.width() as f32 - pen_x;
        let run = face.rasterize_clipped(&op.content, op.font_px, visible);
        let left = pen_x - run.pad_x;
        let top = op.y - run.height as f32 / 2.0;
        let color = match op.role {
            TextRole::Body => body,
            TextRole::Reference => muted,
        };
        surface.draw_glyphs(&run, left, top, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFace;
    use pretty_assertions::assert_eq;

    /// Every char is `self.0` px wide regardless of font size.
    struct PerChar(f32);

    impl TextMeasure for PerChar {
        fn measure(&self, text: &str, _px: f32) -> f32 {
            text.chars().count() as f32 * self.0
        }
    }

    #[test]
    fn test_wrap_greedy() {
        // 10 px per char, 100 px max → at most 10 chars per line
        let lines = wrap_words("aaa bbb ccc ddd eeee", 100.0, 10.0, &PerChar(10.0));
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd", "eeee"]);
    }

    #[test]
    fn test_wrap_exact_fit_stays_on_line() {
        let lines = wrap_words("aaaa bbbbb", 100.0, 10.0, &PerChar(10.0));
        assert_eq!(lines, vec!["aaaa bbbbb"]);
    }

    #[test]
    fn test_overlong_word_alone() {
        let lines = wrap_words("hi supercalifragilistic yo", 100.0, 10.0, &PerChar(10.0));
        assert_eq!(lines, vec!["hi", "supercalifragilistic", "yo"]);
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        let lines = wrap_words("  a \n\t b  ", 1000.0, 10.0, &PerChar(10.0));
        assert_eq!(lines, vec!["a b"]);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        let layout = layout_passage("", "Psalm 46:10", 1080, 1080, SizePreset::Square, &BitmapFace);
        assert!(layout.lines.is_empty());
        assert_eq!(layout.block_height, 0.0);
        assert_eq!(layout.start_y, 540.0);
        let reference = layout.reference.unwrap();
        assert_eq!((reference.x, reference.y), (540.0, 620.0));
    }

    #[test]
    fn test_empty_reference_suppressed() {
        let layout = layout_passage("Jesus wept.", "   ", 1080, 1080, SizePreset::Square, &BitmapFace);
        assert!(layout.reference.is_none());
        assert_eq!(layout.ops().count(), 1);
    }

    #[test]
    fn test_line_positions() {
        // Bitmap face at 68px: 34px per char; limit 864px → 25 chars per line
        let text = "Be still, and know that I am God.";
        let layout = layout_passage(text, "Psalm 46:10", 1080, 1080, SizePreset::Square, &BitmapFace);

        assert_eq!(layout.line_height, 102.0);
        assert_eq!(
            layout.lines.iter().map(|l| l.content.as_str()).collect::<Vec<_>>(),
            vec!["Be still, and know that I", "am God."]
        );
        assert_eq!(layout.block_height, 204.0);
        assert_eq!(layout.start_y, 438.0);
        assert_eq!(layout.lines[0].y, 489.0);
        assert_eq!(layout.lines[1].y, 591.0);
        assert!(layout.lines.iter().all(|l| l.x == 540.0 && l.font_px == 68.0));

        let reference = layout.reference.unwrap();
        assert_eq!(reference.y, 438.0 + 204.0 + 80.0);
        assert_eq!(reference.font_px, 34.0);
        assert_eq!(reference.role, TextRole::Reference);
    }

    #[test]
    fn test_font_size_follows_preset() {
        let story = layout_passage("word", "", 1080, 1920, SizePreset::Story, &BitmapFace);
        let wide = layout_passage("word", "x", 1920, 1080, SizePreset::Wide, &BitmapFace);
        assert_eq!(story.lines[0].font_px, 72.0);
        assert_eq!(wide.lines[0].font_px, 64.0);
        assert_eq!(wide.reference.unwrap().font_px, 32.0);
    }

    #[test]
    fn test_paint_inks_text_color() {
        let mut surface = Surface::new(400, 200);
        surface.fill(Color::WHITE);
        let layout = layout_passage("HI", "", 400, 200, SizePreset::Square, &BitmapFace);
        paint_passage(&mut surface, &layout, &FontFace::builtin(), "#FF0000");

        let red = surface
            .image()
            .pixels()
            .filter(|p| p[0] == 255 && p[1] == 0 && p[2] == 0)
            .count();
        assert!(red > 0);
    }

    #[test]
    fn test_paint_overlong_word_spans_surface() {
        let mut surface = Surface::new(1080, 1080);
        surface.fill(Color::WHITE);
        let word = "a".repeat(20_000);
        let layout = layout_passage(&word, "", 1080, 1080, SizePreset::Square, &BitmapFace);
        assert_eq!(layout.lines.len(), 1);
        paint_passage(&mut surface, &layout, &FontFace::builtin(), "#FF0000");

        let red_in = |xs: std::ops::Range<u32>| {
            xs.flat_map(|x| (0..1080).map(move |y| (x, y)))
                .any(|(x, y)| surface.pixel(x, y)[0] == 255 && surface.pixel(x, y)[1] == 0)
        };
        assert!(red_in(0..100));
        assert!(red_in(980..1080));
    }
}
