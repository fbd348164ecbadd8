//! The batch pipeline: scan → captions → per-image processing.
//!
//! Each image is an independent unit of work. Setup failures (missing input
//! folder, unreadable titles file) abort the run before processing starts;
//! failures while processing a single image are reported with the file name
//! and never abort the batch.

pub mod captions;
pub mod processor;
pub mod scan;

pub use captions::{captions_from_filenames, load_captions, reconcile, CaptionError};
pub use processor::{process_image, run_batch, BatchSummary, LabeledImage, ProcessError};
pub use scan::{scan_images, ScanError, IMAGE_EXTENSIONS};
