//! # Background Rendering
//!
//! Paints the full surface before any text is drawn and reports the text
//! color that belongs with the background.
//!
//! ## Palette styles
//!
//! | Style    | Fill                                         |
//! |----------|----------------------------------------------|
//! | minimal  | flat `background`                            |
//! | gradient | vertical `background` → `background_alt`     |
//! | paper    | flat `background` + 1000 translucent specks  |
//! | night    | flat `background`                            |
//!
//! ## Photo
//!
//! The photo is scaled to cover the surface (cropping one axis), drawn at
//! `photo_opacity`, then optionally tinted with a full-surface overlay.

use image::{imageops::FilterType, DynamicImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::{hex_to_rgba, Color};
use crate::model::{PaletteSetting, PhotoAppearance, Style};
use crate::render::surface::Surface;

pub const PAPER_SPECKLE_COUNT: usize = 1000;
pub const PAPER_SPECKLE_SIZE: u32 = 2;
pub const PAPER_SPECKLE_COLOR: Color = Color {
    r: 0,
    g: 0,
    b: 0,
    a: 0.04,
};

/// Where the paper texture gets its randomness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoiseSource {
    /// Fresh pattern on every render.
    #[default]
    Random,
    /// Same pattern for the same seed and surface size.
    Seeded(u64),
}

/// Paint a palette style. Returns the text color for it.
pub fn paint_palette(surface: &mut Surface, style: Style, setting: &PaletteSetting, noise: NoiseSource) -> String {
    let background = Color::from_hex(&setting.background);

    match style {
        Style::Gradient => {
            let bottom = setting
                .background_alt
                .as_deref()
                .map(Color::from_hex)
                .unwrap_or(background);
            surface.vertical_gradient(background, bottom);
        }
        Style::Paper => {
            surface.fill(background);
            match noise {
                NoiseSource::Random => scatter_specks(surface, &mut rand::rng()),
                NoiseSource::Seeded(seed) => scatter_specks(surface, &mut StdRng::seed_from_u64(seed)),
            }
        }
        Style::Minimal | Style::Night => surface.fill(background),
    }

    setting.text.clone()
}

fn scatter_specks<R: Rng>(surface: &mut Surface, rng: &mut R) {
    let (w, h) = (surface.width(), surface.height());
    if w == 0 || h == 0 {
        return;
    }
    for _ in 0..PAPER_SPECKLE_COUNT {
        let x = rng.random_range(0..w) as i64;
        let y = rng.random_range(0..h) as i64;
        surface.fill_rect(x, y, PAPER_SPECKLE_SIZE, PAPER_SPECKLE_SIZE, PAPER_SPECKLE_COLOR);
    }
}

/// Ask the photo host for a pre-cropped rendition at the target size.
pub fn photo_source_url(full: &str, width: u32, height: u32) -> String {
    let separator = if full.contains('?') { '&' } else { '?' };
    format!("{}{}w={}&h={}&fit=crop&auto=format", full, separator, width, height)
}

/// Placement of a cover-fitted image on the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f32,
    pub width: u32,
    pub height: u32,
    /// Top-left corner; negative on the overflowing axis.
    pub x: i64,
    pub y: i64,
}

/// Scale so the image covers `target_w × target_h`, centered.
pub fn cover_fit(img_w: u32, img_h: u32, target_w: u32, target_h: u32) -> CoverFit {
    let scale = (target_w as f32 / img_w.max(1) as f32).max(target_h as f32 / img_h.max(1) as f32);
    let width = (img_w as f32 * scale).round().max(1.0) as u32;
    let height = (img_h as f32 * scale).round().max(1.0) as u32;

    CoverFit {
        scale,
        width,
        height,
        x: ((target_w as f32 - width as f32) / 2.0).round() as i64,
        y: ((target_h as f32 - height as f32) / 2.0).round() as i64,
    }
}

/// Region of the source image left visible by a cover fit, as
/// `(x, y, width, height)` in source pixels.
pub fn cover_crop(img_w: u32, img_h: u32, target_w: u32, target_h: u32) -> (u32, u32, u32, u32) {
    let fit = cover_fit(img_w, img_h, target_w, target_h);
    let img_w = img_w.max(1);
    let img_h = img_h.max(1);
    let width = ((target_w as f32 / fit.scale).round() as u32).clamp(1, img_w);
    let height = ((target_h as f32 / fit.scale).round() as u32).clamp(1, img_h);
    ((img_w - width) / 2, (img_h - height) / 2, width, height)
}

/// Paint a loaded photo with the photo appearance. Returns the text color.
///
/// Only the visible part of the photo is resampled, straight to the
/// surface size.
pub fn paint_photo(surface: &mut Surface, photo: &DynamicImage, appearance: &PhotoAppearance) -> String {
    surface.clear();

    let (width, height) = (surface.width(), surface.height());
    let (x, y, crop_w, crop_h) = cover_crop(photo.width(), photo.height(), width, height);
    let scaled = photo
        .crop_imm(x, y, crop_w, crop_h)
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgba8();
    surface.draw_image(&scaled, 0, 0, appearance.photo_opacity);

    if appearance.overlay_opacity > 0.0 {
        surface.fill(hex_to_rgba(&appearance.overlay_color, appearance.overlay_opacity));
    }

    appearance.text_color.clone()
}
