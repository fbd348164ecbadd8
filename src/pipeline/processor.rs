//! Per-image processing and the batch loop.
//!
//! Each image goes through decode → layout → composite → encode. A failure
//! at any stage is terminal for that image only: it is reported with the
//! file name and the batch moves on. Nothing is retried.

use crate::config::StyleConfig;
use crate::font::FontChain;
use crate::layout::{self, LayoutError};
use crate::render;
use image::io::Reader as ImageReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("{0}")]
    Layout(#[from] LayoutError),

    #[error("failed to write {path}: {source}")]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Result of labeling a single image.
#[derive(Debug, Clone)]
pub struct LabeledImage {
    /// Where the labeled image was written.
    pub path: PathBuf,
    /// Number of wrapped caption lines.
    pub lines: usize,
    /// Height of the caption band in pixels.
    pub band_height: u32,
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images labeled successfully.
    pub processed: usize,
    /// Images attempted.
    pub total: usize,
    /// Images labeled with a repeated (extended) caption.
    pub extended: usize,
}

/// Label a single image and write the result as `<stem>_labeled.<ext>` in
/// `output_dir`.
///
/// The output is written in one `save` call after compositing succeeds, so a
/// failed image never leaves a half-written file behind.
pub fn process_image(
    input: &Path,
    output_dir: &Path,
    caption: &str,
    style: &StyleConfig,
    fonts: &FontChain,
) -> Result<LabeledImage, ProcessError> {
    let reader = ImageReader::open(input)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|source| ProcessError::Open {
            path: input.to_path_buf(),
            source,
        })?;
    let decoded = reader.decode().map_err(|source| ProcessError::Decode {
        path: input.to_path_buf(),
        source,
    })?;
    let original = decoded.to_rgb8();

    let layout = layout::compute_layout(original.width(), original.height(), caption, style, fonts)?;
    let labeled = render::render_labeled(&original, &layout, style);

    let output_path = output_dir.join(output_name(input));
    labeled.save(&output_path).map_err(|source| ProcessError::Save {
        path: output_path.clone(),
        source,
    })?;

    Ok(LabeledImage {
        path: output_path,
        lines: layout.lines.len(),
        band_height: layout.band_height,
    })
}

/// `<stem>_labeled.<ext>`, mirroring the input extension.
fn output_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => PathBuf::from(format!("{stem}_labeled.{ext}")),
        None => PathBuf::from(format!("{stem}_labeled")),
    }
}

/// Run the batch: one output per input, failures isolated per image.
///
/// `original_captions` is the caption count before reconciliation extended
/// the list; images beyond it are reported as carrying a repeated caption.
pub fn run_batch(
    images: &[PathBuf],
    captions: &[String],
    original_captions: usize,
    output_dir: &Path,
    style: &StyleConfig,
    fonts: &FontChain,
) -> BatchSummary {
    let mut summary = BatchSummary {
        total: images.len(),
        ..BatchSummary::default()
    };

    for (index, (input, caption)) in images.iter().zip(captions).enumerate() {
        let extended = index >= original_captions;
        match process_image(input, output_dir, caption, style, fonts) {
            Ok(labeled) => {
                summary.processed += 1;
                if extended {
                    summary.extended += 1;
                }
                tracing::info!(
                    file = %input.display(),
                    output = %labeled.path.display(),
                    lines = labeled.lines,
                    extended,
                    "labeled image"
                );
            }
            Err(err) => {
                tracing::error!(file = %input.display(), error = %err, "skipping image");
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;

    fn write_image(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([90, 120, 200]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_output_name_mirrors_extension() {
        assert_eq!(
            output_name(Path::new("photos/cat.jpg")),
            PathBuf::from("cat_labeled.jpg")
        );
        assert_eq!(
            output_name(Path::new("dog.PNG")),
            PathBuf::from("dog_labeled.PNG")
        );
        assert_eq!(
            output_name(Path::new("bare")),
            PathBuf::from("bare_labeled")
        );
    }

    #[test]
    fn test_process_image_writes_extended_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_image(&input, 320, 240);

        let style = StyleConfig::default();
        let fonts = FontChain::new(None);
        let labeled = process_image(&input, dir.path(), "A test caption", &style, &fonts).unwrap();

        assert_eq!(labeled.path, dir.path().join("photo_labeled.png"));
        assert!(labeled.lines >= 1);
        let written = image::open(&labeled.path).unwrap().to_rgb8();
        assert_eq!(written.width(), 320);
        assert_eq!(written.height(), 240 + labeled.band_height);
    }

    #[test]
    fn test_process_image_rejects_corrupt_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        fs::write(&input, b"definitely not a png").unwrap();

        let style = StyleConfig::default();
        let fonts = FontChain::new(None);
        let result = process_image(&input, dir.path(), "caption", &style, &fonts);
        assert!(matches!(result, Err(ProcessError::Decode { .. })));
        assert!(!dir.path().join("broken_labeled.png").exists());
    }

    #[test]
    fn test_process_image_invalid_geometry_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sliver.png");
        // 4px wide but tall: padding swallows the whole width.
        write_image(&input, 4, 1000);

        let style = StyleConfig::default();
        let fonts = FontChain::new(None);
        let result = process_image(&input, dir.path(), "caption", &style, &fonts);
        assert!(matches!(
            result,
            Err(ProcessError::Layout(LayoutError::InvalidGeometry { .. }))
        ));
    }

    #[test]
    fn test_run_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        write_image(&good, 200, 150);
        fs::write(&bad, b"garbage").unwrap();

        let output = dir.path().join("out");
        fs::create_dir(&output).unwrap();

        let images = vec![bad, good];
        let captions = vec!["first".to_string(), "second".to_string()];
        let style = StyleConfig::default();
        let fonts = FontChain::new(None);

        let summary = run_batch(&images, &captions, 2, &output, &style, &fonts);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.extended, 0);
        assert!(output.join("good_labeled.png").exists());
        assert!(!output.join("bad_labeled.png").exists());
    }

    #[test]
    fn test_run_batch_counts_extended_captions() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        fs::create_dir(&output).unwrap();

        let mut images = Vec::new();
        for i in 0..4 {
            let path = dir.path().join(format!("img{i}.png"));
            write_image(&path, 160, 120);
            images.push(path);
        }
        let captions = vec![
            "a".to_string(),
            "b".to_string(),
            "b".to_string(),
            "b".to_string(),
        ];

        let style = StyleConfig::default();
        let fonts = FontChain::new(None);
        let summary = run_batch(&images, &captions, 2, &output, &style, &fonts);
        assert_eq!(summary.processed, 4);
        assert_eq!(summary.extended, 2);
    }
}
