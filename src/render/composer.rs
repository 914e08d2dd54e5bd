//! # Composition
//!
//! [`Composer`] owns the [`CompositionRequest`] and the surface it is painted
//! on. Setters only record changes; [`Composer::refresh`] paints once for
//! however many changes came before it.
//!
//! Palette backgrounds paint synchronously. Photo backgrounds first paint
//! the palette card at the new size, then load on a spawned task and paint
//! over it when the image arrives, provided nothing has changed since the
//! load started. Each change bumps a generation counter;
//! a photo task compares its captured generation against the current one
//! while holding the surface lock, so a superseded load can never overwrite
//! a newer render.

use image::DynamicImage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use crate::error::VersecardError;
use crate::font::FontFace;
use crate::model::{
    BackgroundMode, CompositionRequest, PaletteSetting, PhotoAppearance, PhotoRecord, SizePreset, Style,
};
use crate::render::background::{paint_palette, paint_photo, photo_source_url, NoiseSource};
use crate::render::export::{self, ExportedImage};
use crate::render::layout::{layout_passage, paint_passage};
use crate::render::surface::Surface;
use crate::sources::ImageLoader;

/// How a render ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The requested background and text were painted.
    Painted,
    /// The photo could not be loaded; the palette was painted instead.
    FellBack,
    /// A newer change superseded this render before it could paint.
    Stale,
}

/// Completion of one render. Palette renders are already complete.
#[derive(Debug)]
pub enum RenderHandle {
    Ready(RenderOutcome),
    Pending(JoinHandle<RenderOutcome>),
}

impl RenderHandle {
    pub fn is_ready(&self) -> bool {
        matches!(self, RenderHandle::Ready(_))
    }

    pub async fn wait(self) -> Result<RenderOutcome, VersecardError> {
        match self {
            RenderHandle::Ready(outcome) => Ok(outcome),
            RenderHandle::Pending(task) => task
                .await
                .map_err(|e| VersecardError::Image(format!("Photo render task failed: {}", e))),
        }
    }
}

/// Paint a complete card for `request` over `surface`.
///
/// `photo` is the decoded background; `None` paints the palette of the
/// current style. The surface is resized to the preset first.
pub fn paint_card(
    surface: &mut Surface,
    request: &CompositionRequest,
    face: &FontFace,
    noise: NoiseSource,
    photo: Option<&DynamicImage>,
) {
    let (width, height) = request.size.dimensions();
    surface.reset(width, height);

    let text_color = match photo {
        Some(photo) => paint_photo(surface, photo, &request.photo_appearance),
        None => paint_palette(surface, request.style, request.palette(), noise),
    };

    let layout = layout_passage(
        &request.verse_text,
        &request.reference_label,
        width,
        height,
        request.size,
        face,
    );
    paint_passage(surface, &layout, face, &text_color);
}

/// Render a palette card without an orchestrator.
pub fn render_palette(request: &CompositionRequest, face: &FontFace, noise: NoiseSource) -> Surface {
    let (width, height) = request.size.dimensions();
    let mut surface = Surface::new(width, height);
    paint_card(&mut surface, request, face, noise, None);
    surface
}

fn lock(surface: &Mutex<Surface>) -> MutexGuard<'_, Surface> {
    surface.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Composer {
    request: CompositionRequest,
    face: Arc<FontFace>,
    loader: Arc<dyn ImageLoader>,
    surface: Arc<Mutex<Surface>>,
    generation: Arc<AtomicU64>,
    dirty: bool,
    noise: NoiseSource,
}

impl Composer {
    /// A composer for `request`. Nothing is painted until the first
    /// [`refresh`](Self::refresh).
    pub fn new(request: CompositionRequest, face: Arc<FontFace>, loader: Arc<dyn ImageLoader>) -> Self {
        let (width, height) = request.size.dimensions();
        Self {
            request,
            face,
            loader,
            surface: Arc::new(Mutex::new(Surface::new(width, height))),
            generation: Arc::new(AtomicU64::new(0)),
            dirty: true,
            noise: NoiseSource::default(),
        }
    }

    pub fn with_noise(mut self, noise: NoiseSource) -> Self {
        self.noise = noise;
        self
    }

    pub fn request(&self) -> &CompositionRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// A copy of the surface as it is right now.
    pub fn snapshot(&self) -> Surface {
        lock(&self.surface).clone()
    }

    /// Encode the current surface with the filename for the current reference.
    pub fn export(&self) -> Result<ExportedImage, VersecardError> {
        let surface = lock(&self.surface);
        export::export(&surface, &self.request.reference_label)
    }

    fn invalidate(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.dirty = true;
    }

    fn update<T: PartialEq>(&mut self, value: T, field: impl FnOnce(&mut CompositionRequest) -> &mut T) {
        let slot = field(&mut self.request);
        if *slot != value {
            *slot = value;
            self.invalidate();
        }
    }

    pub fn set_verse_text(&mut self, text: &str) {
        self.update(text.to_string(), |r| &mut r.verse_text);
    }

    pub fn set_reference(&mut self, reference: &str) {
        self.update(reference.to_string(), |r| &mut r.reference_label);
    }

    pub fn set_style(&mut self, style: Style) {
        self.update(style, |r| &mut r.style);
    }

    pub fn set_size(&mut self, size: SizePreset) {
        self.update(size, |r| &mut r.size);
    }

    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        self.update(mode, |r| &mut r.background_mode);
    }

    pub fn set_palette_setting(&mut self, style: Style, setting: PaletteSetting) {
        if self.request.palette_settings.get(style) != &setting {
            self.request.palette_settings.set(style, setting);
            self.invalidate();
        }
    }

    /// Restore the built-in colors for one style.
    pub fn reset_palette(&mut self, style: Style) {
        if !self.request.palette_settings.is_default(style) {
            self.request.palette_settings.reset(style);
            self.invalidate();
        }
    }

    pub fn select_photo(&mut self, photo: Option<PhotoRecord>) {
        self.update(photo, |r| &mut r.selected_photo);
    }

    /// Values outside the allowed opacity ranges are clamped.
    pub fn set_photo_appearance(&mut self, appearance: PhotoAppearance) {
        self.update(appearance.clamped(), |r| &mut r.photo_appearance);
    }

    /// Render if anything changed since the last render.
    pub fn refresh(&mut self) -> Option<RenderHandle> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.render())
    }

    /// Render the current request unconditionally.
    ///
    /// Photo renders must be started from within a tokio runtime.
    pub fn render(&self) -> RenderHandle {
        let generation = self.generation();
        let request = self.request.clone();

        tracing::info!(
            style = %request.style,
            size = %request.size,
            mode = ?request.background_mode,
            generation,
            "render"
        );

        let Some(photo) = request.active_photo().cloned() else {
            paint_card(&mut lock(&self.surface), &request, &self.face, self.noise, None);
            return RenderHandle::Ready(RenderOutcome::Painted);
        };

        // Until the photo arrives the surface holds this request's palette card
        paint_card(&mut lock(&self.surface), &request, &self.face, self.noise, None);

        let (width, height) = request.size.dimensions();
        let url = photo_source_url(&photo.full, width, height);
        let face = self.face.clone();
        let loader = self.loader.clone();
        let surface = self.surface.clone();
        let current = self.generation.clone();
        let noise = self.noise;

        RenderHandle::Pending(tokio::spawn(async move {
            let loaded = loader.load(&url).await;

            let mut surface = lock(&surface);
            if current.load(Ordering::SeqCst) != generation {
                tracing::debug!(%url, generation, "discarding superseded photo load");
                return RenderOutcome::Stale;
            }
            match loaded {
                Ok(image) => {
                    paint_card(&mut surface, &request, &face, noise, Some(&image));
                    RenderOutcome::Painted
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "photo unavailable, painting palette");
                    paint_card(&mut surface, &request, &face, noise, None);
                    RenderOutcome::FellBack
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};

    struct SolidLoader;

    #[async_trait]
    impl ImageLoader for SolidLoader {
        async fn load(&self, _url: &str) -> Result<DynamicImage, VersecardError> {
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 30, 30, 255]))))
        }
    }

    struct NeverLoader;

    #[async_trait]
    impl ImageLoader for NeverLoader {
        async fn load(&self, _url: &str) -> Result<DynamicImage, VersecardError> {
            std::future::pending().await
        }
    }

    fn composer() -> Composer {
        Composer::new(
            CompositionRequest::new("Rejoice always.", "1 Thessalonians 5:16"),
            Arc::new(FontFace::builtin()),
            Arc::new(SolidLoader),
        )
        .with_noise(NoiseSource::Seeded(1))
    }

    #[test]
    fn test_refresh_coalesces_changes() {
        let mut c = composer();
        c.set_style(Style::Night);
        c.set_size(SizePreset::Wide);
        c.set_verse_text("Pray without ceasing.");

        let handle = c.refresh().unwrap();
        assert!(handle.is_ready());
        assert!(c.refresh().is_none());
        assert_eq!(c.snapshot().width(), 1920);
    }

    #[test]
    fn test_unchanged_setter_does_not_invalidate() {
        let mut c = composer();
        c.refresh();
        let before = c.generation();

        c.set_style(Style::Minimal);
        c.set_reference("1 Thessalonians 5:16");
        c.reset_palette(Style::Paper);
        assert_eq!(c.generation(), before);
        assert!(!c.is_dirty());

        c.set_reference("1 Thess 5:16");
        assert_eq!(c.generation(), before + 1);
        assert!(c.is_dirty());
    }

    #[test]
    fn test_appearance_is_clamped() {
        let mut c = composer();
        c.set_photo_appearance(PhotoAppearance {
            photo_opacity: 0.1,
            overlay_color: "#000000".into(),
            overlay_opacity: 2.0,
            text_color: "#FFFFFF".into(),
        });
        assert_eq!(c.request().photo_appearance.photo_opacity, 0.3);
        assert_eq!(c.request().photo_appearance.overlay_opacity, 0.9);
    }

    #[test]
    fn test_selected_photo_ignored_in_palette_mode() {
        let mut c = composer();
        c.select_photo(Some(PhotoRecord {
            id: "p".into(),
            full: "https://img/p.jpg".into(),
            ..Default::default()
        }));
        // Palette mode never spawns, so no runtime is needed here
        assert!(c.refresh().unwrap().is_ready());
        assert_eq!(c.snapshot(), render_palette(c.request(), &FontFace::builtin(), NoiseSource::Seeded(1)));
    }

    #[tokio::test]
    async fn test_photo_render_paints_photo() {
        let mut c = composer();
        c.select_photo(Some(PhotoRecord {
            id: "p".into(),
            full: "https://img/p.jpg".into(),
            ..Default::default()
        }));
        c.set_background_mode(BackgroundMode::Photo);
        c.set_photo_appearance(PhotoAppearance::new(1.0, "#000000", 0.0, "#FFFFFF"));

        let outcome = c.refresh().unwrap().wait().await.unwrap();
        assert_eq!(outcome, RenderOutcome::Painted);
        assert_eq!(c.snapshot().pixel(0, 0), Rgba([200, 30, 30, 255]));
    }

    #[tokio::test]
    async fn test_pending_photo_keeps_native_size() {
        let mut c = Composer::new(
            CompositionRequest::new("Jesus wept.", "John 11:35"),
            Arc::new(FontFace::builtin()),
            Arc::new(NeverLoader),
        )
        .with_noise(NoiseSource::Seeded(1));
        c.refresh();

        c.set_size(SizePreset::Wide);
        c.select_photo(Some(PhotoRecord {
            id: "p".into(),
            full: "https://img/p.jpg".into(),
            ..Default::default()
        }));
        c.set_background_mode(BackgroundMode::Photo);
        let pending = c.refresh().unwrap();
        assert!(!pending.is_ready());

        let surface = c.snapshot();
        assert_eq!((surface.width(), surface.height()), (1920, 1080));
        let mut placeholder = c.request().clone();
        placeholder.background_mode = BackgroundMode::Palette;
        assert_eq!(surface, render_palette(&placeholder, &FontFace::builtin(), NoiseSource::Seeded(1)));

        let exported = c.export().unwrap();
        let decoded = image::load_from_memory(&exported.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1920, 1080));
    }

    #[test]
    fn test_export_uses_reference() {
        let mut c = composer();
        c.refresh();
        let exported = c.export().unwrap();
        assert_eq!(exported.filename, "versecard-1-thessalonians-5:16.png");
        let decoded = image::load_from_memory(&exported.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1080, 1080));
    }
}
