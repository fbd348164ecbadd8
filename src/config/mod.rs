//! Run and style configuration.
//!
//! Configuration travels as explicit immutable values: the driver assembles a
//! [`RunConfig`] from CLI flags, an optional YAML file, or the interactive
//! prompts, then resolves the style section into the [`StyleConfig`] consumed
//! by the layout engine and the compositor. No module-level mutable state.
//!
//! # Configuration Example
//!
//! ```yaml
//! input: photos
//! output: output
//! titles: titles.txt
//! sort_by: name
//! style:
//!   text_size_ratio: 0.03
//!   text_color: black
//!   background_color: "#FFFFFF"
//!   position: bottom
//! ```

use clap::ValueEnum;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

// Default values (mirroring the non-configurable constants of the original tool)
fn default_text_size_ratio() -> f32 {
    0.03
}

fn default_padding_ratio() -> f32 {
    0.02
}

fn default_line_spacing_ratio() -> f32 {
    0.3
}

fn default_max_band_height_ratio() -> f32 {
    0.2
}

fn default_min_font_size() -> u32 {
    20
}

fn default_max_font_size() -> u32 {
    150
}

fn default_text_color() -> String {
    "black".to_string()
}

fn default_background_color() -> String {
    "white".to_string()
}

fn default_position() -> BandPosition {
    BandPosition::Bottom
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("photos")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_titles_file() -> PathBuf {
    PathBuf::from("titles.txt")
}

/// Where the caption band is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BandPosition {
    Top,
    Bottom,
}

/// Input image ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Sort by file name
    #[default]
    Name,
    /// Sort by creation date, oldest first
    Date,
}

/// Where captions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptionSource {
    /// One caption per line of the titles file
    #[default]
    File,
    /// Captions derived from image file names
    Filename,
}

/// Named palette offered by the prompts and flags, in menu order.
pub const PALETTE: [(&str, [u8; 3]); 9] = [
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("orange", [255, 165, 0]),
    ("yellow", [255, 255, 0]),
    ("green", [0, 128, 0]),
    ("cyan", [0, 255, 255]),
    ("blue", [0, 0, 255]),
    ("purple", [128, 0, 128]),
];

/// Configuration errors raised while loading or resolving run settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("unknown color {value:?}: expected a palette name or #RGB/#RRGGBB")]
    InvalidColor { value: String },

    #[error("text size ratio {value} out of range (expected 0 < ratio <= 1)")]
    InvalidRatio { value: f32 },

    #[error("font size bounds are inverted: min {min} > max {max}")]
    InvalidFontBounds { min: u32, max: u32 },
}

/// Parse a palette name or hex string into an RGB color.
///
/// Hex values support both #RGB and #RRGGBB; palette names are matched
/// case-insensitively.
pub fn parse_color(value: &str) -> Result<Rgb<u8>, ConfigError> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex, value);
    }

    let lower = trimmed.to_ascii_lowercase();
    PALETTE
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| Rgb(*rgb))
        .ok_or_else(|| ConfigError::InvalidColor {
            value: value.to_string(),
        })
}

fn parse_hex(hex: &str, original: &str) -> Result<Rgb<u8>, ConfigError> {
    let invalid = || ConfigError::InvalidColor {
        value: original.to_string(),
    };

    match hex.len() {
        3 => {
            // #RGB format - each digit doubled: 0xF -> 0xFF
            let r = u8::from_str_radix(&hex[0..1], 16).map_err(|_| invalid())?;
            let g = u8::from_str_radix(&hex[1..2], 16).map_err(|_| invalid())?;
            let b = u8::from_str_radix(&hex[2..3], 16).map_err(|_| invalid())?;
            Ok(Rgb([r * 17, g * 17, b * 17]))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
            let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
            let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
            Ok(Rgb([r, g, b]))
        }
        _ => Err(invalid()),
    }
}

/// File- and flag-facing style settings, colors still in textual form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleOptions {
    /// Base font size as a fraction of image height (default: 0.03)
    #[serde(default = "default_text_size_ratio")]
    pub text_size_ratio: f32,

    /// Band padding as a fraction of image height (default: 0.02)
    #[serde(default = "default_padding_ratio")]
    pub padding_ratio: f32,

    /// Extra line spacing as a fraction of the font size (default: 0.3)
    #[serde(default = "default_line_spacing_ratio")]
    pub line_spacing_ratio: f32,

    /// Cap on band height as a fraction of image height (default: 0.2)
    #[serde(default = "default_max_band_height_ratio")]
    pub max_band_height_ratio: f32,

    /// Lower clamp bound for the chosen font size in pixels (default: 20)
    #[serde(default = "default_min_font_size")]
    pub min_font_size: u32,

    /// Upper clamp bound for the chosen font size in pixels (default: 150)
    #[serde(default = "default_max_font_size")]
    pub max_font_size: u32,

    /// Text color: palette name or hex (default: "black")
    #[serde(default = "default_text_color")]
    pub text_color: String,

    /// Band background color: palette name or hex (default: "white")
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Prefer bold font candidates (default: false)
    #[serde(default)]
    pub bold: bool,

    /// Band position (default: bottom)
    #[serde(default = "default_position")]
    pub position: BandPosition,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            text_size_ratio: default_text_size_ratio(),
            padding_ratio: default_padding_ratio(),
            line_spacing_ratio: default_line_spacing_ratio(),
            max_band_height_ratio: default_max_band_height_ratio(),
            min_font_size: default_min_font_size(),
            max_font_size: default_max_font_size(),
            text_color: default_text_color(),
            background_color: default_background_color(),
            bold: false,
            position: default_position(),
        }
    }
}

impl StyleOptions {
    /// Validate and resolve into the immutable style value the core consumes.
    pub fn resolve(&self) -> Result<StyleConfig, ConfigError> {
        if !(self.text_size_ratio > 0.0 && self.text_size_ratio <= 1.0) {
            return Err(ConfigError::InvalidRatio {
                value: self.text_size_ratio,
            });
        }
        if self.min_font_size > self.max_font_size {
            return Err(ConfigError::InvalidFontBounds {
                min: self.min_font_size,
                max: self.max_font_size,
            });
        }

        Ok(StyleConfig {
            text_size_ratio: self.text_size_ratio,
            padding_ratio: self.padding_ratio,
            line_spacing_ratio: self.line_spacing_ratio,
            max_band_height_ratio: self.max_band_height_ratio,
            min_font_size: self.min_font_size,
            max_font_size: self.max_font_size,
            text_color: parse_color(&self.text_color)?,
            background_color: parse_color(&self.background_color)?,
            bold: self.bold,
            position: self.position,
        })
    }
}

/// Resolved per-run style, immutable, shared by the layout engine and the
/// compositor.
#[derive(Debug, Clone)]
pub struct StyleConfig {
    pub text_size_ratio: f32,
    pub padding_ratio: f32,
    pub line_spacing_ratio: f32,
    pub max_band_height_ratio: f32,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub text_color: Rgb<u8>,
    pub background_color: Rgb<u8>,
    pub bold: bool,
    pub position: BandPosition,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleOptions::default()
            .resolve()
            .expect("default style options are valid")
    }
}

/// Full per-run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Folder with source images (default: "photos")
    #[serde(default = "default_input_dir")]
    pub input: PathBuf,

    /// Folder for labeled images (default: "output")
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,

    /// Titles file, one caption per line (default: "titles.txt")
    #[serde(default = "default_titles_file")]
    pub titles: PathBuf,

    /// Caption source (default: titles file)
    #[serde(default)]
    pub caption_source: CaptionSource,

    /// Image ordering (default: by name)
    #[serde(default)]
    pub sort_by: SortOrder,

    /// Repeat the last caption over remaining images without confirmation
    #[serde(default)]
    pub auto_extend: bool,

    /// Custom .ttf font path; the standard candidate chain is used when unset
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font: Option<PathBuf>,

    /// Style settings
    #[serde(default)]
    pub style: StyleOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: default_input_dir(),
            output: default_output_dir(),
            titles: default_titles_file(),
            caption_source: CaptionSource::default(),
            sort_by: SortOrder::default(),
            auto_extend: false,
            font: None,
            style: StyleOptions::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
