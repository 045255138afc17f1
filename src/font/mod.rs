//! Font discovery module
//!
//! Locates font data for the rasterizer: an explicit path from the config,
//! a family name through font-kit (feature `system-fonts`), then a list of
//! well-known monospace font files.

use crate::config::FontConfig;
use crate::render::FontGlyphs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Font data could not be parsed")]
    InvalidFont,
    #[error("No usable font found; set font.path in the config file")]
    NotFound,
}

/// Monospace fonts with block element coverage, checked in order
const FONT_CANDIDATES: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/usr/share/fonts/gnu-free/FreeMono.otf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    // macOS
    "/System/Library/Fonts/Menlo.ttc",
    "/Library/Fonts/Courier New.ttf",
    // Windows
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Preferred monospace font families
#[cfg(feature = "system-fonts")]
const MONOSPACE_FONT_FAMILIES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Ubuntu Mono",
    "Menlo",
    "Consolas",
    "Courier New",
];

fn load_font_file(path: &Path) -> Result<FontGlyphs, FontError> {
    let data = std::fs::read(path).map_err(|source| FontError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    FontGlyphs::from_bytes(data)
}

/// Load font data by family name from system fonts
#[cfg(feature = "system-fonts")]
pub fn load_font_by_name(family_name: &str) -> Option<Vec<u8>> {
    use font_kit::family_name::FamilyName;
    use font_kit::properties::{Properties, Weight};
    use font_kit::source::SystemSource;

    let source = SystemSource::new();

    let handle = source
        .select_best_match(
            &[FamilyName::Title(family_name.to_string())],
            &Properties::new().weight(Weight::NORMAL),
        )
        .ok()?;

    let font = handle.load().ok()?;
    Some(font.copy_font_data()?.to_vec())
}

#[cfg(feature = "system-fonts")]
fn find_system_font(preferred: Option<&str>) -> Option<FontGlyphs> {
    for family in preferred.into_iter().chain(MONOSPACE_FONT_FAMILIES.iter().copied()) {
        let Some(data) = load_font_by_name(family) else {
            continue;
        };
        match FontGlyphs::from_bytes(data) {
            Ok(glyphs) => {
                tracing::info!("Found monospace font: {}", family);
                return Some(glyphs);
            }
            Err(e) => tracing::warn!("Skipping font family {}: {}", family, e),
        }
    }
    None
}

#[cfg(not(feature = "system-fonts"))]
fn find_system_font(preferred: Option<&str>) -> Option<FontGlyphs> {
    if let Some(family) = preferred {
        tracing::warn!(
            "Font family {} requested but system font lookup is not compiled in",
            family
        );
    }
    None
}

/// First candidate file that exists and parses
fn find_candidate_font(candidates: &[&str]) -> Option<FontGlyphs> {
    for candidate in candidates {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        match load_font_file(path) {
            Ok(glyphs) => {
                tracing::info!("Using font file: {}", path.display());
                return Some(glyphs);
            }
            Err(e) => tracing::warn!("Skipping font candidate: {}", e),
        }
    }
    None
}

/// Load the font configured in `config`, falling back to discovery.
///
/// An explicit path is authoritative: if it cannot be loaded the error is
/// returned instead of silently rendering with another font.
pub fn load_font(config: &FontConfig) -> Result<FontGlyphs, FontError> {
    if let Some(path) = &config.path {
        return load_font_file(path);
    }

    find_system_font(config.family.as_deref())
        .or_else(|| find_candidate_font(FONT_CANDIDATES))
        .ok_or(FontError::NotFound)
}
