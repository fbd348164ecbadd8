//! Caption acquisition and reconciliation.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("failed to read titles file {path}: {source}")]
    ReadTitles {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("titles file {path} contains no captions")]
    EmptyTitles { path: PathBuf },

    #[error("no captions available to extend")]
    Empty,

    #[error("caption reconciliation declined")]
    Declined,
}

/// Parse the titles file: one caption per line, trimmed, blank lines dropped.
pub fn load_captions(path: &Path) -> Result<Vec<String>, CaptionError> {
    let content = fs::read_to_string(path).map_err(|source| CaptionError::ReadTitles {
        path: path.to_path_buf(),
        source,
    })?;

    let captions: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if captions.is_empty() {
        return Err(CaptionError::EmptyTitles {
            path: path.to_path_buf(),
        });
    }
    Ok(captions)
}

/// Derive captions from file stems, with `_` and `-` read as spaces.
///
/// A stem that becomes blank after cleanup keeps its raw form so the caption
/// is never empty.
pub fn captions_from_filenames(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let cleaned = stem.replace(['_', '-'], " ").trim().to_string();
            if cleaned.is_empty() {
                stem.to_string()
            } else {
                cleaned
            }
        })
        .collect()
}

/// Extend a short caption list by repeating its last entry until it covers
/// `image_count` images.
///
/// Returns the possibly-extended list and the number of repeated entries.
/// When auto-extend is off, `confirm` is consulted with the caption that will
/// be repeated and the number of images it will cover; declining cancels the
/// run.
pub fn reconcile(
    mut captions: Vec<String>,
    image_count: usize,
    auto_extend: bool,
    confirm: impl FnOnce(&str, usize) -> bool,
) -> Result<(Vec<String>, usize), CaptionError> {
    if captions.len() >= image_count {
        return Ok((captions, 0));
    }

    let last = captions.last().cloned().ok_or(CaptionError::Empty)?;
    let missing = image_count - captions.len();

    tracing::warn!(
        captions = captions.len(),
        images = image_count,
        missing,
        "fewer captions than images"
    );

    if !auto_extend && !confirm(&last, missing) {
        return Err(CaptionError::Declined);
    }

    captions.extend(std::iter::repeat(last).take(missing));
    Ok((captions, missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_captions_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "First\n\n  Second  \n\t\nThird\n").unwrap();

        let captions = load_captions(file.path()).unwrap();
        assert_eq!(captions, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_load_captions_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\n  \n").unwrap();

        assert!(matches!(
            load_captions(file.path()),
            Err(CaptionError::EmptyTitles { .. })
        ));
    }

    #[test]
    fn test_load_captions_missing_file() {
        assert!(matches!(
            load_captions(Path::new("/nonexistent/titles.txt")),
            Err(CaptionError::ReadTitles { .. })
        ));
    }

    #[test]
    fn test_filename_captions_clean_separators() {
        let files = vec![
            PathBuf::from("photos/sunset_over_lake.jpg"),
            PathBuf::from("photos/winter-trip.png"),
            PathBuf::from("photos/plain.png"),
        ];
        assert_eq!(
            captions_from_filenames(&files),
            vec!["sunset over lake", "winter trip", "plain"]
        );
    }

    #[test]
    fn test_filename_caption_never_blank() {
        let files = vec![PathBuf::from("photos/_.png")];
        assert_eq!(captions_from_filenames(&files), vec!["_"]);
    }

    // Test: reconciliation

    #[test]
    fn test_reconcile_enough_captions_untouched() {
        let captions = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let (result, repeated) =
            reconcile(captions.clone(), 3, false, |_, _| panic!("no confirm")).unwrap();
        assert_eq!(result, captions);
        assert_eq!(repeated, 0);
    }

    #[test]
    fn test_reconcile_surplus_captions_untouched() {
        let captions = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let (result, repeated) = reconcile(captions, 2, true, |_, _| true).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(repeated, 0);
    }

    #[test]
    fn test_reconcile_auto_extends_with_last() {
        let captions = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let (result, repeated) =
            reconcile(captions, 5, true, |_, _| panic!("auto-extend skips confirm")).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(repeated, 2);
        assert_eq!(result[3], "three");
        assert_eq!(result[4], "three");
    }

    #[test]
    fn test_reconcile_confirmed_extension() {
        let captions = vec!["only".to_string()];
        let (result, repeated) = reconcile(captions, 4, false, |last, missing| {
            assert_eq!(last, "only");
            assert_eq!(missing, 3);
            true
        })
        .unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(repeated, 3);
    }

    #[test]
    fn test_reconcile_declined() {
        let captions = vec!["only".to_string()];
        assert!(matches!(
            reconcile(captions, 4, false, |_, _| false),
            Err(CaptionError::Declined)
        ));
    }

    #[test]
    fn test_reconcile_no_captions_at_all() {
        assert!(matches!(
            reconcile(Vec::new(), 3, true, |_, _| true),
            Err(CaptionError::Empty)
        ));
    }
}
