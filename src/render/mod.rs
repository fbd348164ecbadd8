//! The caption-band compositor.
//!
//! Allocates the extended canvas, pastes the original image at the offset the
//! band position dictates, and draws each wrapped line centered horizontally
//! in the band. Glyphs are rasterized through their outlines and blended onto
//! the opaque canvas by coverage. Lines that run past the capped band height
//! are still drawn; the overflow is deliberate behavior, not clipped.

use crate::config::{BandPosition, StyleConfig};
use crate::font::CaptionFont;
use crate::layout::Layout;
use ab_glyph::{point, Font, GlyphId, ScaleFont};
use image::{imageops, Rgb, RgbImage};

/// Composite `original` with its caption band per the layout decision.
///
/// Returns a new image; the original is not modified.
pub fn render_labeled(original: &RgbImage, layout: &Layout, style: &StyleConfig) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(
        layout.canvas_width,
        layout.canvas_height,
        style.background_color,
    );

    let (paste_y, band_top) = match style.position {
        BandPosition::Bottom => (0u32, original.height()),
        BandPosition::Top => (layout.band_height, 0u32),
    };
    imageops::replace(&mut canvas, original, 0, paste_y as i64);

    let mut y = band_top + layout.padding;
    for line in &layout.lines {
        let text_width = layout.font.line_width(line);
        let x = (layout.canvas_width as i32 - text_width as i32) / 2;
        draw_line(&mut canvas, line, &layout.font, x, y as i32, style.text_color);
        y += layout.line_height;
    }

    canvas
}

/// Draw one line of text with its top edge at `y`, blending glyph coverage
/// against whatever the canvas already holds. Out-of-bounds pixels (possible
/// for overflow lines with a negative x) are discarded.
fn draw_line(canvas: &mut RgbImage, text: &str, font: &CaptionFont, x: i32, y: i32, color: Rgb<u8>) {
    let scaled = font.face().as_scaled(font.scale());
    let baseline = y as f32 + scaled.ascent();
    let (canvas_width, canvas_height) = (canvas.width(), canvas.height());

    let mut cursor = x as f32;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            cursor += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(font.scale(), point(cursor, baseline));
        if let Some(outlined) = font.face().outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let cx = px as i32 + bounds.min.x as i32;
                let cy = py as i32 + bounds.min.y as i32;
                if cx >= 0 && cy >= 0 && (cx as u32) < canvas_width && (cy as u32) < canvas_height {
                    let pixel = canvas.get_pixel_mut(cx as u32, cy as u32);
                    *pixel = blend_coverage(*pixel, color, coverage);
                }
            });
        }

        cursor += scaled.h_advance(id);
        prev = Some(id);
    }
}

/// Blend the text color over an opaque background pixel by glyph coverage.
fn blend_coverage(background: Rgb<u8>, text: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let c = coverage.clamp(0.0, 1.0);
    let mix = |bg: u8, fg: u8| -> u8 {
        (bg as f32 + (fg as f32 - bg as f32) * c)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgb([
        mix(background[0], text[0]),
        mix(background[1], text[1]),
        mix(background[2], text[2]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontChain;
    use crate::layout::compute_layout;

    const SOURCE_COLOR: Rgb<u8> = Rgb([180, 40, 40]);

    fn labeled(width: u32, height: u32, caption: &str, style: &StyleConfig) -> (RgbImage, Layout) {
        let original = RgbImage::from_pixel(width, height, SOURCE_COLOR);
        let fonts = FontChain::new(None);
        let layout = compute_layout(width, height, caption, style, &fonts).unwrap();
        let canvas = render_labeled(&original, &layout, style);
        (canvas, layout)
    }

    #[test]
    fn test_canvas_matches_layout_dimensions() {
        let style = StyleConfig::default();
        let (canvas, layout) = labeled(320, 240, "A caption", &style);
        assert_eq!(canvas.width(), layout.canvas_width);
        assert_eq!(canvas.height(), layout.canvas_height);
        assert!(canvas.height() > 240);
    }

    #[test]
    fn test_bottom_band_keeps_original_at_origin() {
        let style = StyleConfig::default();
        let (canvas, layout) = labeled(320, 240, "A caption", &style);
        assert_eq!(*canvas.get_pixel(0, 0), SOURCE_COLOR);
        assert_eq!(*canvas.get_pixel(319, 239), SOURCE_COLOR);
        // Band corner below the image is background.
        assert_eq!(
            *canvas.get_pixel(0, 240 + layout.band_height - 1),
            style.background_color
        );
    }

    #[test]
    fn test_top_band_shifts_original_down() {
        let style = StyleConfig {
            position: BandPosition::Top,
            ..StyleConfig::default()
        };
        let (canvas, layout) = labeled(320, 240, "A caption", &style);
        // Band corner at the top is background; original starts below it.
        assert_eq!(*canvas.get_pixel(0, 0), style.background_color);
        assert_eq!(*canvas.get_pixel(0, layout.band_height), SOURCE_COLOR);
        assert_eq!(
            *canvas.get_pixel(319, layout.band_height + 239),
            SOURCE_COLOR
        );
    }

    #[test]
    fn test_band_contains_rendered_text() {
        let style = StyleConfig::default();
        let (canvas, layout) = labeled(400, 300, "Visible caption text", &style);
        let band_top = 300;
        let mut dark_pixels = 0usize;
        for y in band_top..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.get_pixel(x, y)[0] < 128 {
                    dark_pixels += 1;
                }
            }
        }
        assert!(
            dark_pixels > 0,
            "expected black glyph coverage in a {}px band",
            layout.band_height
        );
    }

    #[test]
    fn test_custom_colors_applied() {
        let style = StyleConfig {
            background_color: Rgb([0, 0, 255]),
            text_color: Rgb([255, 255, 0]),
            ..StyleConfig::default()
        };
        let (canvas, _) = labeled(300, 200, "Colors", &style);
        assert_eq!(*canvas.get_pixel(0, 210), Rgb([0, 0, 255]));
    }

    #[test]
    fn test_overflow_lines_do_not_panic() {
        // Narrow image forces the measured pass and negative centering
        // offsets; drawing must stay in bounds.
        let style = StyleConfig::default();
        let word: String = std::iter::repeat('w').take(80).collect();
        let (canvas, layout) = labeled(60, 600, &word, &style);
        assert_eq!(canvas.width(), 60);
        assert!(layout.lines.len() > 1);
    }

    #[test]
    fn test_original_untouched_by_render() {
        let original = RgbImage::from_pixel(100, 80, SOURCE_COLOR);
        let fonts = FontChain::new(None);
        let style = StyleConfig::default();
        let layout = compute_layout(100, 80, "note", &style, &fonts).unwrap();
        let _ = render_labeled(&original, &layout, &style);
        assert!(original.pixels().all(|p| *p == SOURCE_COLOR));
    }

    #[test]
    fn test_blend_coverage_endpoints() {
        let bg = Rgb([255, 255, 255]);
        let fg = Rgb([0, 0, 0]);
        assert_eq!(blend_coverage(bg, fg, 0.0), bg);
        assert_eq!(blend_coverage(bg, fg, 1.0), fg);
        let mid = blend_coverage(bg, fg, 0.5);
        assert!(mid[0] > 100 && mid[0] < 160);
    }
}
