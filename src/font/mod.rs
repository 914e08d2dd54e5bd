//! # Font Faces
//!
//! The face that measures text is the face that paints it. Line wrapping
//! decides breaks from [`TextMeasure::measure`] and the painter blits the
//! [`GlyphRun`] produced by the same face at the same pixel size, so the two
//! can never disagree about how wide a line is.
//!
//! Two faces are available:
//!
//! - [`TtfFace`]: any TrueType/OpenType file, rasterized with ab_glyph
//! - [`BitmapFace`]: the built-in Spleen 12×24 bitmap font, scaled
//!   nearest-neighbour to the requested size (used when no font is configured)

mod bitmap;
mod ttf;

pub use bitmap::BitmapFace;
pub use ttf::TtfFace;

use std::ops::Range;
use std::path::Path;

use crate::error::VersecardError;

/// Width of a single-line string at a pixel size.
pub trait TextMeasure {
    fn measure(&self, text: &str, px: f32) -> f32;
}

/// Rasterized single-line text as an anti-aliased coverage buffer.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    pub width: usize,
    pub height: usize,
    /// Coverage values: 0.0 = empty, 1.0 = fully inked.
    pub coverage: Vec<f32>,
    /// Measured advance width (what [`TextMeasure::measure`] returns).
    pub advance: f32,
    /// Distance from the buffer's left edge to the pen origin. Negative
    /// when the run was clipped to start past the origin.
    pub pad_x: f32,
}

impl GlyphRun {
    pub fn empty(height: usize) -> Self {
        Self {
            width: 0,
            height,
            coverage: Vec::new(),
            advance: 0.0,
            pad_x: 0.0,
        }
    }
}

/// A loaded face.
#[derive(Debug, Clone)]
pub enum FontFace {
    Ttf(TtfFace),
    Bitmap(BitmapFace),
}

impl FontFace {
    /// The built-in bitmap face.
    pub fn builtin() -> Self {
        FontFace::Bitmap(BitmapFace)
    }

    /// Load a TTF/OTF file.
    pub fn from_file(path: &Path) -> Result<Self, VersecardError> {
        let data = std::fs::read(path)?;
        TtfFace::from_vec(data).map(FontFace::Ttf)
    }

    /// Load the configured font, or fall back to the built-in face.
    pub fn load(path: Option<&Path>) -> Result<Self, VersecardError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FontFace::Ttf(_) => "ttf",
            FontFace::Bitmap(_) => "spleen-12x24",
        }
    }

    /// Rasterize one line of text at `px`.
    pub fn rasterize(&self, text: &str, px: f32) -> GlyphRun {
        match self {
            FontFace::Ttf(face) => face.rasterize(text, px),
            FontFace::Bitmap(face) => face.rasterize(text, px),
        }
    }

    /// Rasterize only the part of a line whose pen x lies in `visible`,
    /// measured from the line's origin.
    pub fn rasterize_clipped(&self, text: &str, px: f32, visible: Range<f32>) -> GlyphRun {
        match self {
            FontFace::Ttf(face) => face.rasterize_clipped(text, px, visible),
            FontFace::Bitmap(face) => face.rasterize_clipped(text, px, visible),
        }
    }
}

impl TextMeasure for BitmapFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        BitmapFace::measure(self, text, px)
    }
}

impl TextMeasure for TtfFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        TtfFace::measure(self, text, px)
    }
}

impl TextMeasure for FontFace {
    fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            FontFace::Ttf(face) => face.measure(text, px),
            FontFace::Bitmap(face) => face.measure(text, px),
        }
    }
}
