//! # Rendering Module
//!
//! Turns a [`CompositionRequest`](crate::model::CompositionRequest) into a
//! raster at the native size of its preset.
//!
//! ## Modules
//!
//! - [`surface`]: RGBA raster with source-over drawing
//! - [`layout`]: word wrap, vertical centering and the reference line
//! - [`background`]: palette fills and cover-fitted photos
//! - [`composer`]: request ownership, render coalescing, stale-load suppression
//! - [`export`]: PNG encoding and the download filename
//!
//! ## Usage Example
//!
//! ```
//! use versecard::font::FontFace;
//! use versecard::model::{CompositionRequest, SizePreset, Style};
//! use versecard::render::{background::NoiseSource, composer, export};
//!
//! let mut request = CompositionRequest::new("The LORD is my shepherd; I shall not want.", "Psalm 23:1");
//! request.style = Style::Paper;
//! request.size = SizePreset::Story;
//!
//! let surface = composer::render_palette(&request, &FontFace::builtin(), NoiseSource::Seeded(7));
//! assert_eq!((surface.width(), surface.height()), (1080, 1920));
//!
//! let png = export::export(&surface, &request.reference_label).unwrap();
//! assert_eq!(png.filename, "versecard-psalm-23:1.png");
//! ```

pub mod background;
pub mod composer;
pub mod export;
pub mod layout;
pub mod surface;

pub use composer::{Composer, RenderHandle, RenderOutcome};
pub use surface::Surface;
