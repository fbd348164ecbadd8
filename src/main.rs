use capband::config::{BandPosition, CaptionSource, RunConfig, SortOrder, StyleOptions};
use capband::error::CapbandError;
use capband::font::FontChain;
use capband::interactive;
use capband::pipeline::{self, BatchSummary, CaptionError};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Capband - batch image labeler that appends caption bands to images
#[derive(Parser, Debug)]
#[command(name = "capband")]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder with source images
    #[arg(short, long, default_value = "photos")]
    input: PathBuf,

    /// Folder for labeled images
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Titles file, one caption per line
    #[arg(short, long, default_value = "titles.txt")]
    titles: PathBuf,

    /// Caption band position
    #[arg(short, long, value_enum, default_value_t = BandPosition::Bottom)]
    position: BandPosition,

    /// Prefer bold font candidates
    #[arg(short, long)]
    bold: bool,

    /// Repeat the last caption over remaining images without confirmation
    #[arg(short = 'a', long)]
    auto_extend: bool,

    /// Run the interactive parameter prompts
    #[arg(short = 'I', long)]
    interactive: bool,

    /// Image sort order
    #[arg(short, long, value_enum, default_value_t = SortOrder::Name)]
    sort_by: SortOrder,

    /// Derive captions from file names instead of the titles file
    #[arg(short = 'u', long)]
    use_filename: bool,

    /// Custom .ttf font path
    #[arg(long)]
    font: Option<PathBuf>,

    /// YAML config file; replaces the per-option flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text size as a percent of image height (1-100)
    #[arg(long, default_value_t = 3)]
    text_size: u32,

    /// Text color: palette name or #RRGGBB
    #[arg(long, default_value = "black")]
    text_color: String,

    /// Band background color: palette name or #RRGGBB
    #[arg(long, default_value = "white")]
    background: String,
}

fn main() -> ExitCode {
    // Initialize logging subsystem
    capband::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    let args = Args::parse();

    // With no arguments at all, drop into the interactive prompts like the
    // original tool.
    let config = if args.interactive || std::env::args().len() == 1 {
        match interactive::collect(RunConfig::default()) {
            Some(config) => config,
            None => {
                tracing::info!("setup cancelled");
                return ExitCode::SUCCESS;
            }
        }
    } else if let Some(path) = &args.config {
        match RunConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load configuration: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        match run_config_from_args(&args) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    };

    tracing::info!(
        input = %config.input.display(),
        output = %config.output.display(),
        captions = ?config.caption_source,
        position = ?config.style.position,
        "configuration loaded"
    );

    match run(config) {
        Ok(summary) => {
            tracing::info!(
                processed = summary.processed,
                total = summary.total,
                extended = summary.extended,
                "batch complete"
            );
            ExitCode::SUCCESS
        }
        Err(CapbandError::Cancelled) => {
            tracing::info!("processing cancelled");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "run aborted");
            ExitCode::FAILURE
        }
    }
}

/// Assemble a run configuration from the CLI flags.
fn run_config_from_args(args: &Args) -> Result<RunConfig, CapbandError> {
    if !(1..=100).contains(&args.text_size) {
        return Err(CapbandError::Config(format!(
            "text size {}% out of range (1-100)",
            args.text_size
        )));
    }

    let style = StyleOptions {
        text_size_ratio: args.text_size as f32 / 100.0,
        text_color: args.text_color.clone(),
        background_color: args.background.clone(),
        bold: args.bold,
        position: args.position,
        ..StyleOptions::default()
    };

    Ok(RunConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        titles: args.titles.clone(),
        caption_source: if args.use_filename {
            CaptionSource::Filename
        } else {
            CaptionSource::File
        },
        sort_by: args.sort_by,
        auto_extend: args.auto_extend,
        font: args.font.clone(),
        style,
    })
}

/// Scan, reconcile captions, and process the batch.
fn run(config: RunConfig) -> Result<BatchSummary, CapbandError> {
    let style = config.style.resolve()?;

    std::fs::create_dir_all(&config.output).map_err(|err| {
        CapbandError::Scan(format!(
            "failed to create output folder {}: {err}",
            config.output.display()
        ))
    })?;

    let images = pipeline::scan_images(&config.input, config.sort_by)?;
    if images.is_empty() {
        return Err(CapbandError::Scan(format!(
            "no images found in {}",
            config.input.display()
        )));
    }
    tracing::info!(
        images = images.len(),
        input = %config.input.display(),
        "scanned input folder"
    );

    let (captions, original_count) = match config.caption_source {
        CaptionSource::File => {
            let captions = pipeline::load_captions(&config.titles)?;
            let count = captions.len();
            let image_count = images.len();
            let (captions, _) =
                pipeline::reconcile(captions, image_count, config.auto_extend, |last, missing| {
                    interactive::ask_confirmation(&format!(
                        "Only {count} captions for {image_count} images; repeat {last:?} for the \
                         remaining {missing}?"
                    ))
                })
                .map_err(|err| match err {
                    CaptionError::Declined => CapbandError::Cancelled,
                    other => other.into(),
                })?;
            (captions, count)
        }
        CaptionSource::Filename => {
            let captions = pipeline::captions_from_filenames(&images);
            let count = captions.len();
            tracing::info!(captions = count, "derived captions from file names");
            (captions, count)
        }
    };

    let fonts = FontChain::new(config.font.clone());
    Ok(pipeline::run_batch(
        &images,
        &captions,
        original_count,
        &config.output,
        &style,
        &fonts,
    ))
}
