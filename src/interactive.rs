//! Interactive parameter collection.
//!
//! A step-through prompt sequence covering the same options as the CLI
//! flags, ending with a settings summary and a final confirmation. Every
//! prompt accepts an empty line for its default; EOF on stdin answers every
//! remaining prompt with its default and the final confirmation with "no".

use crate::config::{parse_color, BandPosition, CaptionSource, RunConfig, SortOrder, PALETTE};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const PERCENT_PRESETS: [u32; 7] = [3, 4, 5, 6, 7, 8, 9];

/// Ask a yes/no question until an intelligible answer arrives.
pub fn ask_confirmation(question: &str) -> bool {
    loop {
        print!("{question} (y/n): ");
        let _ = io::stdout().flush();
        let Some(answer) = read_line() else {
            return false;
        };
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => println!("Please answer 'y' or 'n'"),
        }
    }
}

/// Run the prompt sequence. Returns `None` when the user declines the final
/// confirmation.
pub fn collect(defaults: RunConfig) -> Option<RunConfig> {
    println!("{}", "=".repeat(60));
    println!("        PARAMETER SETUP");
    println!("{}", "=".repeat(60));

    let mut config = defaults;

    println!("\nStep 1: paths");
    config.input = prompt_path("Folder with source images:", &config.input);
    config.output = prompt_path("Folder for labeled images:", &config.output);

    config.caption_source = select_caption_source(config.caption_source);
    if config.caption_source == CaptionSource::File {
        config.titles = prompt_path("Titles file:", &config.titles);
    }

    config.sort_by = select_sort(config.sort_by);
    config.font = select_font();

    config.style.text_size_ratio =
        select_percentage("Text size relative to image height:", 3);
    config.style.text_color = select_color("Text color:", "black");
    config.style.bold = select_yes_no("Bold text?", false);
    config.style.position = select_position(config.style.position);
    config.style.background_color = select_color("Band background color:", "white");

    config.auto_extend = if config.caption_source == CaptionSource::File {
        select_yes_no(
            "Automatically repeat the last caption when captions run short?",
            false,
        )
    } else {
        false
    };

    print_summary(&config);
    if ask_confirmation("Start processing with these settings?") {
        Some(config)
    } else {
        None
    }
}

fn print_summary(config: &RunConfig) {
    println!("\n{}", "=".repeat(60));
    println!("        SETTINGS SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Source images:   {}", config.input.display());
    println!("Output folder:   {}", config.output.display());
    match config.caption_source {
        CaptionSource::File => println!("Captions:        from {}", config.titles.display()),
        CaptionSource::Filename => println!("Captions:        from file names"),
    }
    println!(
        "Sort order:      {}",
        match config.sort_by {
            SortOrder::Name => "by name",
            SortOrder::Date => "by creation date",
        }
    );
    match &config.font {
        Some(path) => println!("Font:            custom ({})", path.display()),
        None => println!("Font:            standard candidates"),
    }
    println!(
        "Text size:       {:.0}% of image height",
        config.style.text_size_ratio * 100.0
    );
    println!("Text color:      {}", config.style.text_color);
    println!("Bold:            {}", if config.style.bold { "yes" } else { "no" });
    println!(
        "Position:        {}",
        match config.style.position {
            BandPosition::Top => "top",
            BandPosition::Bottom => "bottom",
        }
    );
    println!("Background:      {}", config.style.background_color);
    if config.caption_source == CaptionSource::File {
        println!(
            "Auto-extend:     {}",
            if config.auto_extend { "yes" } else { "no" }
        );
    }
    println!("{}", "=".repeat(60));
}

/// Read a trimmed line from stdin; `None` on EOF or read failure.
fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Parse a 1-based menu choice within `1..=max`.
fn parse_choice(input: &str, max: usize) -> Option<usize> {
    input.parse::<usize>().ok().filter(|n| (1..=max).contains(n))
}

fn prompt_path(label: &str, default: &Path) -> PathBuf {
    print!("\n{label} [default: {}]: ", default.display());
    let _ = io::stdout().flush();
    match read_line() {
        Some(input) if !input.is_empty() => PathBuf::from(input),
        _ => default.to_path_buf(),
    }
}

fn select_percentage(label: &str, default_percent: u32) -> f32 {
    println!("\n{label}");
    println!("Preset values:");
    for (i, preset) in PERCENT_PRESETS.iter().enumerate() {
        println!("  {}. {preset}%", i + 1);
    }
    println!("  {}. custom value", PERCENT_PRESETS.len() + 1);

    loop {
        print!(
            "Choose an option (1-{}) [default {default_percent}%]: ",
            PERCENT_PRESETS.len() + 1
        );
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            return default_percent as f32 / 100.0;
        };
        if input.is_empty() {
            return default_percent as f32 / 100.0;
        }

        match parse_choice(&input, PERCENT_PRESETS.len() + 1) {
            Some(n) if n <= PERCENT_PRESETS.len() => {
                return PERCENT_PRESETS[n - 1] as f32 / 100.0;
            }
            Some(_) => {
                print!("Custom percent (1-100): ");
                let _ = io::stdout().flush();
                if let Some(custom) = read_line() {
                    if let Ok(percent) = custom.parse::<u32>() {
                        if (1..=100).contains(&percent) {
                            return percent as f32 / 100.0;
                        }
                    }
                }
                println!("Value must be between 1 and 100");
            }
            None => println!(
                "Please enter a number between 1 and {}",
                PERCENT_PRESETS.len() + 1
            ),
        }
    }
}

fn select_color(label: &str, default_name: &str) -> String {
    println!("\n{label}");
    println!("Available colors:");
    for (i, (name, _)) in PALETTE.iter().enumerate() {
        println!("  {}. {name}", i + 1);
    }
    println!("  {}. custom #RRGGBB", PALETTE.len() + 1);

    loop {
        print!(
            "Choose a color (1-{}) [default {default_name}]: ",
            PALETTE.len() + 1
        );
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            return default_name.to_string();
        };
        if input.is_empty() {
            return default_name.to_string();
        }

        match parse_choice(&input, PALETTE.len() + 1) {
            Some(n) if n <= PALETTE.len() => return PALETTE[n - 1].0.to_string(),
            Some(_) => {
                print!("Hex value (#RRGGBB): ");
                let _ = io::stdout().flush();
                if let Some(hex) = read_line() {
                    if parse_color(&hex).is_ok() {
                        return hex;
                    }
                }
                println!("Invalid hex value");
            }
            None => println!("Please enter a number between 1 and {}", PALETTE.len() + 1),
        }
    }
}

fn select_yes_no(label: &str, default: bool) -> bool {
    let default_text = if default { "yes" } else { "no" };
    loop {
        print!("\n{label} (y/n) [default {default_text}]: ");
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            return default;
        };
        if input.is_empty() {
            return default;
        }
        match input.to_ascii_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => println!("Please answer 'y' or 'n'"),
        }
    }
}

fn select_position(default: BandPosition) -> BandPosition {
    let default_text = match default {
        BandPosition::Top => "top",
        BandPosition::Bottom => "bottom",
    };
    println!("\nCaption position:");
    println!("  1. top");
    println!("  2. bottom");
    loop {
        print!("Choose a position (1-2) [default {default_text}]: ");
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            return default;
        };
        if input.is_empty() {
            return default;
        }
        match parse_choice(&input, 2) {
            Some(1) => return BandPosition::Top,
            Some(_) => return BandPosition::Bottom,
            None => println!("Please choose 1 or 2"),
        }
    }
}

fn select_sort(default: SortOrder) -> SortOrder {
    let default_text = match default {
        SortOrder::Name => "by name",
        SortOrder::Date => "by creation date",
    };
    println!("\nImage sort order:");
    println!("  1. by name");
    println!("  2. by creation date");
    loop {
        print!("Choose a sort order (1-2) [default {default_text}]: ");
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            return default;
        };
        if input.is_empty() {
            return default;
        }
        match parse_choice(&input, 2) {
            Some(1) => return SortOrder::Name,
            Some(_) => return SortOrder::Date,
            None => println!("Please choose 1 or 2"),
        }
    }
}

fn select_caption_source(default: CaptionSource) -> CaptionSource {
    let default_text = match default {
        CaptionSource::File => "from the titles file",
        CaptionSource::Filename => "from file names",
    };
    println!("\nCaption source:");
    println!("  1. from the titles file");
    println!("  2. from image file names");
    loop {
        print!("Choose a source (1-2) [default {default_text}]: ");
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            return default;
        };
        if input.is_empty() {
            return default;
        }
        match parse_choice(&input, 2) {
            Some(1) => return CaptionSource::File,
            Some(_) => return CaptionSource::Filename,
            None => println!("Please choose 1 or 2"),
        }
    }
}

fn select_font() -> Option<PathBuf> {
    println!("\nFont:");
    println!("  1. standard candidates (Times, then the built-in fallback)");
    println!("  2. custom .ttf file");
    loop {
        print!("Choose an option (1-2) [default 1]: ");
        let _ = io::stdout().flush();
        let Some(input) = read_line() else {
            return None;
        };
        if input.is_empty() {
            return None;
        }
        match parse_choice(&input, 2) {
            Some(1) => return None,
            Some(_) => {
                print!("Path to the .ttf file: ");
                let _ = io::stdout().flush();
                if let Some(path) = read_line() {
                    if path.is_empty() {
                        return None;
                    }
                    let path = PathBuf::from(path);
                    if path.is_file() {
                        return Some(path);
                    }
                    println!("File {} does not exist", path.display());
                } else {
                    return None;
                }
            }
            None => println!("Please choose 1 or 2"),
        }
    }
}
