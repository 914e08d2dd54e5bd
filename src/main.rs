//! # Versecard CLI
//!
//! Command-line interface for composing verse cards.
//!
//! ## Usage
//!
//! ```bash
//! # Render typed text on the default palette
//! versecard render --text "Be still, and know that I am God." --reference "Psalm 46:10"
//!
//! # Look the verse up and render it as a story on paper (style shortcut 3)
//! versecard render --reference "John 3:16" --translation kjv --style 3 --size story
//!
//! # Use the first photo found for a keyword, dimmed, with a light overlay
//! versecard render --reference "Psalm 19:1" --photo-query "night sky" --photo-opacity 0.8 --overlay-opacity 0.2
//!
//! # Search photos
//! versecard photos mountains
//!
//! # Run the credential proxy
//! versecard serve --listen 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use versecard::{
    VersecardError,
    config::Settings,
    font::FontFace,
    model::{BackgroundMode, CompositionRequest, PaletteSetting, PhotoAppearance, PhotoRecord, SizePreset, Style},
    render::{Composer, RenderOutcome, background::NoiseSource},
    server::{self, ServerConfig},
    sources::{HttpImageLoader, PhotoSearch, Translation, UnsplashClient, VerseLibrary, http_client},
};

/// Versecard - verse image composer
#[derive(Parser, Debug)]
#[command(name = "versecard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a verse card to PNG
    Render(RenderArgs),

    /// Search background photos
    Photos {
        /// Search keyword
        keyword: String,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "12")]
        per_page: u32,
    },

    /// Run the verse and photo proxy
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
    },
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Verse text to render (looked up from --reference when omitted)
    #[arg(long)]
    text: Option<String>,

    /// Reference shown under the verse
    #[arg(long)]
    reference: Option<String>,

    /// Translation used for lookups (web, kjv, asv, bbe, esv)
    #[arg(long, default_value = "web")]
    translation: Translation,

    /// Style name or shortcut digit: minimal (1), gradient (2), paper (3), night (4)
    #[arg(long, default_value = "minimal")]
    style: Style,

    /// Size preset: story, square, wide
    #[arg(long, default_value = "square")]
    size: SizePreset,

    /// Palette background color for the chosen style
    #[arg(long, value_name = "HEX")]
    background: Option<String>,

    /// Gradient bottom color
    #[arg(long, value_name = "HEX")]
    background_alt: Option<String>,

    /// Palette text color for the chosen style
    #[arg(long, value_name = "HEX")]
    text_color: Option<String>,

    /// Photo to use as the background
    #[arg(long, value_name = "URL", conflicts_with = "photo_query")]
    photo_url: Option<String>,

    /// Use the first photo found for this keyword
    #[arg(long, value_name = "KEYWORD")]
    photo_query: Option<String>,

    /// Photo opacity (0.3 to 1.0)
    #[arg(long, default_value = "1.0")]
    photo_opacity: f32,

    /// Overlay color drawn over the photo
    #[arg(long, value_name = "HEX", default_value = "#000000")]
    overlay_color: String,

    /// Overlay opacity (0.0 to 0.9)
    #[arg(long, default_value = "0.35")]
    overlay_opacity: f32,

    /// Text color on photo backgrounds
    #[arg(long, value_name = "HEX", default_value = "#FFFFFF")]
    photo_text_color: String,

    /// Seed for the paper texture
    #[arg(long)]
    seed: Option<u64>,

    /// TrueType/OpenType font (overrides VERSECARD_FONT)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Output file (defaults to versecard-<reference>.png)
    #[arg(long, short, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("versecard=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), VersecardError> {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Render(args) => render(args, settings).await,
        Commands::Photos {
            keyword,
            page,
            per_page,
        } => {
            let search = UnsplashClient::new(
                http_client()?,
                settings.unsplash_api_url.clone(),
                settings.unsplash_access_key.clone(),
            );
            let results = search.search(&keyword, page, per_page).await?;
            if results.is_empty() {
                println!("No photos found for '{}'", keyword);
            }
            for photo in results {
                println!("{}  {} (by {})", photo.id, photo.description, photo.photographer);
                println!("    {}", photo.full);
            }
            Ok(())
        }
        Commands::Serve { listen } => server::serve(ServerConfig { listen_addr: listen }, settings).await,
    }
}

async fn render(args: RenderArgs, settings: Settings) -> Result<(), VersecardError> {
    let client = http_client()?;

    let (verse_text, reference_label) = match (args.text, args.reference) {
        (Some(text), reference) => (text, reference.unwrap_or_default()),
        (None, Some(reference)) => {
            let verse = VerseLibrary::from_settings(&settings, client.clone())
                .lookup(&reference, args.translation)
                .await?;
            (verse.text, verse.reference)
        }
        (None, None) => {
            return Err(VersecardError::Validation("Pass --text or --reference".into()));
        }
    };

    let mut request = CompositionRequest::new(&verse_text, &reference_label);
    request.style = args.style;
    request.size = args.size;

    if args.background.is_some() || args.background_alt.is_some() || args.text_color.is_some() {
        let base = PaletteSetting::default_for(args.style);
        request.palette_settings.set(
            args.style,
            PaletteSetting {
                background: args.background.unwrap_or(base.background),
                background_alt: args.background_alt.or(base.background_alt),
                text: args.text_color.unwrap_or(base.text),
            },
        );
    }

    let photo = match (args.photo_url, args.photo_query) {
        (Some(url), _) => Some(PhotoRecord {
            id: url.clone(),
            full: url,
            ..Default::default()
        }),
        (None, Some(keyword)) => {
            let search = UnsplashClient::new(
                client.clone(),
                settings.unsplash_api_url.clone(),
                settings.unsplash_access_key.clone(),
            );
            let first = search.search(&keyword, 1, 1).await?.into_iter().next();
            let photo = first.ok_or_else(|| VersecardError::NotFound(format!("No photos found for '{}'", keyword)))?;
            println!("Photo by {} ({})", photo.photographer, photo.link);
            Some(photo)
        }
        (None, None) => None,
    };
    if photo.is_some() {
        request.background_mode = BackgroundMode::Photo;
    }
    request.selected_photo = photo;
    request.photo_appearance = PhotoAppearance::new(
        args.photo_opacity,
        &args.overlay_color,
        args.overlay_opacity,
        &args.photo_text_color,
    );

    let font_path = args.font.or(settings.font_path);
    let face = FontFace::load(font_path.as_deref())?;
    tracing::debug!(face = face.name(), "font loaded");

    let noise = args.seed.map(NoiseSource::Seeded).unwrap_or_default();
    let mut composer = Composer::new(request, Arc::new(face), Arc::new(HttpImageLoader::new(client))).with_noise(noise);

    if let Some(handle) = composer.refresh() {
        if handle.wait().await? == RenderOutcome::FellBack {
            eprintln!("Warning: photo could not be loaded; rendered the {} palette instead", args.style);
        }
    }

    let exported = composer.export()?;
    let out = args.out.unwrap_or_else(|| PathBuf::from(&exported.filename));
    std::fs::write(&out, &exported.bytes)?;

    let (width, height) = args.size.dimensions();
    println!("Saved {}x{} card to {}", width, height, out.display());
    Ok(())
}
