//! # Export
//!
//! PNG encoding of the native-resolution raster and the download filename.

use std::io::Cursor;

use crate::error::VersecardError;
use crate::render::surface::Surface;

pub const FILENAME_PREFIX: &str = "versecard";
pub const FALLBACK_SLUG: &str = "verse";

/// An encoded card, ready to be written or served.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Encode the surface as PNG at its native size.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, VersecardError> {
    let mut png_bytes = Vec::new();
    surface
        .image()
        .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)?;
    Ok(png_bytes)
}

/// `versecard-<slug>.png`, where the slug is the lowercased reference with
/// whitespace runs collapsed to `-`.
pub fn export_filename(reference_label: &str) -> String {
    let slug = reference_label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { FALLBACK_SLUG.to_string() } else { slug };
    format!("{}-{}.png", FILENAME_PREFIX, slug)
}

pub fn export(surface: &Surface, reference_label: &str) -> Result<ExportedImage, VersecardError> {
    Ok(ExportedImage {
        filename: export_filename(reference_label),
        bytes: encode_png(surface)?,
    })
}
