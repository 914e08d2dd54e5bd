//! # Versecard - Verse Image Composer
//!
//! Versecard lays a Bible verse and its reference over a decorative
//! background and produces a PNG at social-media sizes. It provides:
//!
//! - **Layout**: greedy word wrap, vertical centering, a muted reference line
//! - **Backgrounds**: four palette styles or a cover-fitted photo with overlay
//! - **Composition**: one render per batch of changes, stale photo loads dropped
//! - **Sources**: verse lookup, photo search and image loading over HTTP
//! - **Proxy**: an HTTP server that keeps the upstream API keys on the host
//!
//! ## Quick Start
//!
//! ```
//! use versecard::{
//!     font::FontFace,
//!     model::{CompositionRequest, SizePreset, Style},
//!     render::{background::NoiseSource, composer::render_palette, export::encode_png},
//! };
//!
//! let mut request = CompositionRequest::new("In the beginning God created the heavens and the earth.", "Genesis 1:1");
//! request.style = Style::Gradient;
//! request.size = SizePreset::Wide;
//!
//! let surface = render_palette(&request, &FontFace::builtin(), NoiseSource::Random);
//! let png = encode_png(&surface)?;
//! assert!(!png.is_empty());
//!
//! # Ok::<(), versecard::VersecardError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`model`] | Composition request and its value types |
//! | [`render`] | Surface, layout, backgrounds, orchestration, export |
//! | [`font`] | Faces that both measure and paint text |
//! | [`color`] | Hex parsing and alpha helpers |
//! | [`sources`] | Verse, photo and image adapters |
//! | [`server`] | Credential proxy |
//! | [`config`] | Environment settings |
//! | [`error`] | Error types |

pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod model;
pub mod render;
pub mod server;
pub mod sources;

// Re-exports for convenience
pub use config::Settings;
pub use error::VersecardError;
pub use model::CompositionRequest;
pub use render::Composer;
