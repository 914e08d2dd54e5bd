//! # Composition Model
//!
//! The declarative description of one output image.
//!
//! | Size    | Pixels      | Body font | Reference font |
//! |---------|-------------|-----------|----------------|
//! | story   | 1080 × 1920 | 72        | 36             |
//! | square  | 1080 × 1080 | 68        | 34             |
//! | wide    | 1920 × 1080 | 64        | 32             |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named background/text-color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Minimal,
    Gradient,
    Paper,
    Night,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Minimal, Style::Gradient, Style::Paper, Style::Night];

    pub fn name(self) -> &'static str {
        match self {
            Style::Minimal => "minimal",
            Style::Gradient => "gradient",
            Style::Paper => "paper",
            Style::Night => "night",
        }
    }

    /// Digit shortcut: `1` minimal, `2` gradient, `3` paper, `4` night.
    pub fn from_shortcut(key: char) -> Option<Style> {
        match key {
            '1' => Some(Style::Minimal),
            '2' => Some(Style::Gradient),
            '3' => Some(Style::Paper),
            '4' => Some(Style::Night),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(style) = s.chars().next().filter(|_| s.len() == 1).and_then(Style::from_shortcut) {
            return Ok(style);
        }
        Style::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown style '{}' (expected minimal, gradient, paper, night or 1-4)", s))
    }
}

/// Output aspect/resolution preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreset {
    Story,
    #[default]
    Square,
    Wide,
}

impl SizePreset {
    pub const ALL: [SizePreset; 3] = [SizePreset::Story, SizePreset::Square, SizePreset::Wide];

    pub fn name(self) -> &'static str {
        match self {
            SizePreset::Story => "story",
            SizePreset::Square => "square",
            SizePreset::Wide => "wide",
        }
    }

    /// Native raster dimensions `(width, height)` in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            SizePreset::Story => (1080, 1920),
            SizePreset::Square => (1080, 1080),
            SizePreset::Wide => (1920, 1080),
        }
    }

    /// Width over height; on-screen previews must keep this ratio.
    pub fn aspect_ratio(self) -> f32 {
        let (w, h) = self.dimensions();
        w as f32 / h as f32
    }

    /// Verse body font size in raster pixels.
    pub fn body_font_px(self) -> f32 {
        match self {
            SizePreset::Story => 72.0,
            SizePreset::Square => 68.0,
            SizePreset::Wide => 64.0,
        }
    }

    /// Reference line font size in raster pixels.
    pub fn reference_font_px(self) -> f32 {
        match self {
            SizePreset::Story => 36.0,
            SizePreset::Square => 34.0,
            SizePreset::Wide => 32.0,
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SizePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizePreset::ALL
            .into_iter()
            .find(|size| size.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown size '{}' (expected story, square or wide)", s))
    }
}

/// Which background path a render takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Palette,
    Photo,
}

/// Colors for one palette style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSetting {
    pub background: String,
    /// Bottom color of the gradient style; other styles ignore it.
    #[serde(default)]
    pub background_alt: Option<String>,
    pub text: String,
}

impl PaletteSetting {
    pub fn new(background: &str, background_alt: Option<&str>, text: &str) -> Self {
        Self {
            background: background.to_string(),
            background_alt: background_alt.map(str::to_string),
            text: text.to_string(),
        }
    }

    /// Built-in colors for a style.
    pub fn default_for(style: Style) -> Self {
        match style {
            Style::Minimal => Self::new("#F8F7F4", None, "#1B4332"),
            Style::Gradient => Self::new("#1B4332", Some("#52B788"), "#FFFFFF"),
            Style::Paper => Self::new("#F3EAD7", None, "#3D2B1F"),
            Style::Night => Self::new("#0D1B2A", None, "#E0E1DD"),
        }
    }
}

/// Per-style palette settings. Always holds an entry for every style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteSettings {
    entries: [PaletteSetting; 4],
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            entries: Style::ALL.map(PaletteSetting::default_for),
        }
    }
}

impl PaletteSettings {
    pub fn get(&self, style: Style) -> &PaletteSetting {
        &self.entries[style.index()]
    }

    pub fn set(&mut self, style: Style, setting: PaletteSetting) {
        self.entries[style.index()] = setting;
    }

    /// Restore one style to its built-in colors; other styles are untouched.
    pub fn reset(&mut self, style: Style) {
        self.entries[style.index()] = PaletteSetting::default_for(style);
    }

    pub fn is_default(&self, style: Style) -> bool {
        *self.get(style) == PaletteSetting::default_for(style)
    }
}

/// One photo search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub description: String,
    pub photographer: String,
    /// Attribution link to the photo page.
    pub link: String,
    pub thumb: String,
    /// Full-resolution source URL.
    pub full: String,
}

pub const PHOTO_OPACITY_RANGE: (f32, f32) = (0.3, 1.0);
pub const OVERLAY_OPACITY_RANGE: (f32, f32) = (0.0, 0.9);

/// How a photo background is drawn. Independent of the palette settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAppearance {
    pub photo_opacity: f32,
    pub overlay_color: String,
    pub overlay_opacity: f32,
    pub text_color: String,
}

impl Default for PhotoAppearance {
    fn default() -> Self {
        Self {
            photo_opacity: 1.0,
            overlay_color: "#000000".to_string(),
            overlay_opacity: 0.35,
            text_color: "#FFFFFF".to_string(),
        }
    }
}

impl PhotoAppearance {
    /// Build an appearance with opacities clamped into their allowed ranges.
    pub fn new(photo_opacity: f32, overlay_color: &str, overlay_opacity: f32, text_color: &str) -> Self {
        Self {
            photo_opacity: photo_opacity.clamp(PHOTO_OPACITY_RANGE.0, PHOTO_OPACITY_RANGE.1),
            overlay_color: overlay_color.to_string(),
            overlay_opacity: overlay_opacity.clamp(OVERLAY_OPACITY_RANGE.0, OVERLAY_OPACITY_RANGE.1),
            text_color: text_color.to_string(),
        }
    }

    /// Same appearance with both opacities forced back into range.
    pub fn clamped(self) -> Self {
        Self::new(self.photo_opacity, &self.overlay_color, self.overlay_opacity, &self.text_color)
    }
}

/// Everything a render reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositionRequest {
    pub verse_text: String,
    pub reference_label: String,
    pub style: Style,
    pub size: SizePreset,
    pub background_mode: BackgroundMode,
    pub palette_settings: PaletteSettings,
    /// May be set while in palette mode; it has no effect there.
    pub selected_photo: Option<PhotoRecord>,
    pub photo_appearance: PhotoAppearance,
}

impl CompositionRequest {
    pub fn new(verse_text: &str, reference_label: &str) -> Self {
        Self {
            verse_text: verse_text.to_string(),
            reference_label: reference_label.to_string(),
            ..Default::default()
        }
    }

    /// The photo that will actually be drawn, if the photo path is active.
    pub fn active_photo(&self) -> Option<&PhotoRecord> {
        match self.background_mode {
            BackgroundMode::Photo => self.selected_photo.as_ref(),
            BackgroundMode::Palette => None,
        }
    }

    pub fn palette(&self) -> &PaletteSetting {
        self.palette_settings.get(self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_size_dimensions() {
        assert_eq!(SizePreset::Story.dimensions(), (1080, 1920));
        assert_eq!(SizePreset::Square.dimensions(), (1080, 1080));
        assert_eq!(SizePreset::Wide.dimensions(), (1920, 1080));
        assert!((SizePreset::Wide.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_font_tables() {
        assert_eq!(SizePreset::Story.body_font_px(), 72.0);
        assert_eq!(SizePreset::Wide.body_font_px(), 64.0);
        assert_eq!(SizePreset::Square.body_font_px(), 68.0);
        assert_eq!(SizePreset::Story.reference_font_px(), 36.0);
        assert_eq!(SizePreset::Wide.reference_font_px(), 32.0);
        assert_eq!(SizePreset::Square.reference_font_px(), 34.0);
    }

    #[test]
    fn test_style_shortcuts() {
        assert_eq!(Style::from_shortcut('1'), Some(Style::Minimal));
        assert_eq!(Style::from_shortcut('4'), Some(Style::Night));
        assert_eq!(Style::from_shortcut('5'), None);
        assert_eq!("3".parse::<Style>(), Ok(Style::Paper));
        assert_eq!("Gradient".parse::<Style>(), Ok(Style::Gradient));
        assert!("sepia".parse::<Style>().is_err());
    }

    #[test]
    fn test_reset_restores_only_one_style() {
        let mut settings = PaletteSettings::default();
        settings.set(Style::Minimal, PaletteSetting::new("#FF0000", None, "#00FF00"));
        settings.set(Style::Night, PaletteSetting::new("#111111", None, "#EEEEEE"));

        settings.reset(Style::Minimal);

        assert_eq!(*settings.get(Style::Minimal), PaletteSetting::default_for(Style::Minimal));
        assert_eq!(*settings.get(Style::Night), PaletteSetting::new("#111111", None, "#EEEEEE"));
        assert!(settings.is_default(Style::Gradient));
        assert!(!settings.is_default(Style::Night));
    }

    #[test]
    fn test_appearance_clamps() {
        let a = PhotoAppearance::new(0.1, "#000000", 0.95, "#FFFFFF");
        assert_eq!(a.photo_opacity, 0.3);
        assert_eq!(a.overlay_opacity, 0.9);
    }

    #[test]
    fn test_active_photo_only_in_photo_mode() {
        let mut req = CompositionRequest::new("text", "ref");
        req.selected_photo = Some(PhotoRecord {
            id: "p1".into(),
            description: String::new(),
            photographer: String::new(),
            link: String::new(),
            thumb: String::new(),
            full: "https://img/x.jpg".into(),
        });
        assert!(req.active_photo().is_none());
        req.background_mode = BackgroundMode::Photo;
        assert_eq!(req.active_photo().map(|p| p.id.as_str()), Some("p1"));
    }
}
