//! The font resolution chain.
//!
//! Candidate sources are tried in a fixed order until one loads; the chain
//! ends in an embedded fallback so resolution only fails if the embedded
//! bytes themselves fail to parse.

use super::metrics::CaptionFont;
use ab_glyph::{FontArc, FontVec};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Regular-weight candidate file names, probed in order.
pub const REGULAR_CANDIDATES: [&str; 4] = [
    "times.ttf",
    "times new roman.ttf",
    "Times New Roman.ttf",
    "Times.ttf",
];

/// Bold candidate file names, probed before the regular list when bold text
/// is requested.
pub const BOLD_CANDIDATES: [&str; 5] = [
    "timesbd.ttf",
    "timesb.ttf",
    "TIMESBD.TTF",
    "times new roman bold.ttf",
    "Times New Roman Bold.ttf",
];

/// Embedded terminal fallback (DejaVu Sans Mono). Carries no bold variant.
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

static EMBEDDED_FONT: OnceLock<FontArc> = OnceLock::new();

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse font file {path}")]
    Parse { path: PathBuf },

    #[error("embedded fallback font is corrupt")]
    EmbeddedFallback,
}

/// Ordered chain of candidate font sources.
///
/// The parsed face is cached after the first successful resolution and shared
/// across images; only the pixel scale differs per request. The face data is
/// immutable once loaded, so sharing it read-only is safe.
pub struct FontChain {
    custom_path: Option<PathBuf>,
    resolved: OnceLock<FontArc>,
}

impl FontChain {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self {
            custom_path,
            resolved: OnceLock::new(),
        }
    }

    /// Resolve a font at the requested pixel size.
    ///
    /// The first call walks the candidate chain; later calls reuse the cached
    /// face at the new size.
    pub fn resolve(&self, size: u32, bold: bool) -> Result<CaptionFont, FontError> {
        if let Some(face) = self.resolved.get() {
            return Ok(CaptionFont::new(face.clone(), size));
        }

        let face = self.load_first(bold)?;
        let face = self.resolved.get_or_init(|| face).clone();
        Ok(CaptionFont::new(face, size))
    }

    fn load_first(&self, bold: bool) -> Result<FontArc, FontError> {
        // An unloadable custom font falls through to the standard candidates
        // rather than aborting the run.
        if let Some(path) = &self.custom_path {
            match load_font_file(path) {
                Ok(face) => return Ok(face),
                Err(err) => tracing::warn!(
                    font = %path.display(),
                    error = %err,
                    "custom font failed to load, trying standard candidates"
                ),
            }
        }

        let mut candidates: Vec<&str> = Vec::new();
        if bold {
            candidates.extend(BOLD_CANDIDATES);
        }
        candidates.extend(REGULAR_CANDIDATES);

        for name in candidates {
            let path = Path::new(name);
            if !path.exists() {
                continue;
            }
            match load_font_file(path) {
                Ok(face) => {
                    tracing::debug!(font = name, "resolved font candidate");
                    return Ok(face);
                }
                Err(err) => tracing::debug!(font = name, error = %err, "font candidate rejected"),
            }
        }

        embedded_fallback()
    }
}

fn load_font_file(path: &Path) -> Result<FontArc, FontError> {
    let data = std::fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let face = FontVec::try_from_vec(data).map_err(|_| FontError::Parse {
        path: path.to_path_buf(),
    })?;
    Ok(FontArc::from(face))
}

fn embedded_fallback() -> Result<FontArc, FontError> {
    if let Some(face) = EMBEDDED_FONT.get() {
        return Ok(face.clone());
    }
    let face =
        FontArc::try_from_slice(EMBEDDED_FONT_DATA).map_err(|_| FontError::EmbeddedFallback)?;
    Ok(EMBEDDED_FONT.get_or_init(|| face).clone())
}
