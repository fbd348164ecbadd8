//! Scaled font measurement.

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use std::fmt;

/// A loaded font face resolved at a concrete pixel size.
///
/// Wraps the parsed face together with the pixel scale chosen by the layout
/// engine, so measurement and drawing agree on the same scaling. Cheap to
/// clone; the face data is shared.
#[derive(Clone)]
pub struct CaptionFont {
    face: FontArc,
    scale: PxScale,
    size: u32,
}

impl fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptionFont").field("size", &self.size).finish()
    }
}

impl CaptionFont {
    pub fn new(face: FontArc, size: u32) -> Self {
        Self {
            face,
            scale: PxScale::from(size as f32),
            size,
        }
    }

    /// The pixel size this font was resolved at.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }

    pub fn face(&self) -> &FontArc {
        &self.face
    }

    /// Pixel ascent above the text origin at this scale.
    pub fn ascent(&self) -> f32 {
        self.face.as_scaled(self.scale).ascent()
    }

    /// Kerned advance width of a line of text, in whole pixels.
    pub fn line_width(&self, text: &str) -> u32 {
        let scaled = self.face.as_scaled(self.scale);

        let mut width = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }

        width.ceil() as u32
    }

    /// Tight rendered height of `text`: the vertical extent of the union of
    /// outlined glyph bounds. Falls back to the scaled line height when the
    /// text produces no outlines (e.g. whitespace only).
    pub fn text_height(&self, text: &str) -> u32 {
        let scaled = self.face.as_scaled(self.scale);

        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        let mut cursor = 0.0f32;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(cursor, scaled.ascent()));
            if let Some(outlined) = self.face.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                min_y = min_y.min(bounds.min.y);
                max_y = max_y.max(bounds.max.y);
            }
            cursor += scaled.h_advance(id);
            prev = Some(id);
        }

        if max_y > min_y {
            (max_y - min_y).ceil() as u32
        } else {
            scaled.height().ceil() as u32
        }
    }
}
