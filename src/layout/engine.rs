//! The layout engine.

use super::wrap::WrapPass;
use crate::config::StyleConfig;
use crate::font::{CaptionFont, FontChain, FontError};
use std::fmt;

/// Reference string measured once per layout to establish the line advance.
const LINE_HEIGHT_PROBE: &str = "Test";

/// Average glyph width assumed by the estimated wrapping pass, as a fraction
/// of the font size.
const AVG_CHAR_WIDTH_RATIO: f32 = 0.6;

/// Minimum character budget for the estimated pass.
const MIN_CHARS_PER_LINE: usize = 10;

/// Layout decision for one image/caption pair.
///
/// Computed fresh per image, never cached or mutated. The resolved font
/// travels with the layout so the compositor draws with exactly the
/// measurements the engine wrapped against.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Chosen font size, within the configured clamp bounds.
    pub font_size: u32,
    /// Wrapped caption lines, in draw order.
    pub lines: Vec<String>,
    /// Per-line vertical advance, spacing included.
    pub line_height: u32,
    /// Caption band height after capping.
    pub band_height: u32,
    /// Horizontal and vertical band padding.
    pub padding: u32,
    /// Output canvas width (unchanged from the source image).
    pub canvas_width: u32,
    /// Output canvas height (source height plus band height).
    pub canvas_height: u32,
    /// The font the caption was measured with.
    pub font: CaptionFont,
}

/// Errors that can occur while computing a layout.
#[derive(Debug)]
pub enum LayoutError {
    /// The horizontal padding leaves no room for text.
    InvalidGeometry { width: u32, padding: u32 },

    /// No font source in the chain could be loaded.
    FontLoad(FontError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::InvalidGeometry { width, padding } => write!(
                f,
                "invalid geometry: image width {} leaves no text budget with padding {}",
                width, padding
            ),
            LayoutError::FontLoad(err) => write!(f, "font resolution failed: {}", err),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::FontLoad(err) => Some(err),
            LayoutError::InvalidGeometry { .. } => None,
        }
    }
}

impl From<FontError> for LayoutError {
    fn from(err: FontError) -> Self {
        LayoutError::FontLoad(err)
    }
}

/// Compute the layout for one caption on one image.
///
/// The font size is the image height scaled by the configured ratio, clamped
/// to the configured bounds. The caption is wrapped by the estimated pass and
/// falls back to the measured pass when the estimate yields nothing usable
/// (no lines, or a line that measures wider than the pixel budget). The band
/// height is the wrapped line count times the line advance plus padding,
/// capped at the configured fraction of the image height; the cap never drops
/// lines, it only limits the band the compositor allocates.
pub fn compute_layout(
    width: u32,
    height: u32,
    caption: &str,
    style: &StyleConfig,
    fonts: &FontChain,
) -> Result<Layout, LayoutError> {
    let font_size = ((height as f32 * style.text_size_ratio).round() as u32)
        .clamp(style.min_font_size, style.max_font_size);
    let padding = (height as f32 * style.padding_ratio).round() as u32;
    let line_spacing = (font_size as f32 * style.line_spacing_ratio).round() as u32;
    let max_band_height = (height as f32 * style.max_band_height_ratio).round() as u32;

    let font = fonts.resolve(font_size, style.bold)?;

    if width <= 2 * padding {
        return Err(LayoutError::InvalidGeometry { width, padding });
    }
    let budget = width - 2 * padding;

    let avg_char_width = AVG_CHAR_WIDTH_RATIO * font_size as f32;
    let chars_per_line = ((budget as f32 / avg_char_width) as usize).max(MIN_CHARS_PER_LINE);

    let estimated = WrapPass::Estimated { chars_per_line }.wrap(caption);
    let usable = !estimated.is_empty()
        && estimated.iter().all(|line| font.line_width(line) <= budget);
    let lines = if usable {
        estimated
    } else {
        WrapPass::Measured {
            budget_px: budget,
            font: &font,
        }
        .wrap(caption)
    };

    let line_height = font.text_height(LINE_HEIGHT_PROBE) + line_spacing;
    let band_height = (lines.len() as u32 * line_height + 2 * padding).min(max_band_height);

    Ok(Layout {
        font_size,
        line_height,
        band_height,
        padding,
        canvas_width: width,
        canvas_height: height + band_height,
        lines,
        font,
    })
}
