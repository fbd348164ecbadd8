//! Font resolution and measurement.
//!
//! A [`FontChain`] is an ordered list of candidate font sources tried in
//! sequence: an explicit user-supplied path first, then bold file-name
//! candidates when bold is requested, then regular candidates, and finally an
//! embedded DejaVu Sans Mono fallback that always succeeds. The parsed face is
//! cached after the first successful resolution; only the pixel scale differs
//! per image, carried by the [`CaptionFont`] handle the layout engine and the
//! compositor share.

pub mod metrics;
pub mod resolver;

pub use metrics::CaptionFont;
pub use resolver::{FontChain, FontError, BOLD_CANDIDATES, REGULAR_CANDIDATES};
