use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::LevelFilter;

use text_watermark::{default_output_path, watermark_file, WatermarkOptions, DEFAULT_FONT_PATH};

#[derive(Parser)]
#[command(
    name = "text-watermark",
    about = "Stamp a text watermark onto an image, black or white depending on brightness",
    version,
    after_help = "Simple usage: text-watermark <image> <text>  (writes {name}_watermarked.png)\n\n\
                  The output is always PNG. Text that does not fit is clipped, not resized."
)]
struct Cli {
    /// Input image file
    input: PathBuf,

    /// Watermark text
    text: String,

    /// Output PNG file (default: {name}_watermarked.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TrueType/OpenType font file
    #[arg(long, default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,

    /// Font size in pixels per em
    #[arg(long, default_value = "30")]
    font_size: f32,

    /// Inset from the bottom-right corner in pixels
    #[arg(short, long, default_value = "10")]
    margin: u32,

    /// Text alpha (0-255)
    #[arg(long, default_value = "80")]
    opacity: u8,

    /// Mean grayscale value above which white text is used (0-255)
    #[arg(short, long, default_value = "127")]
    threshold: u8,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    if !(cli.font_size.is_finite() && cli.font_size > 0.0) {
        eprintln!("Error: Font size must be a positive number");
        process::exit(1);
    }

    if !cli.input.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input.display());
        process::exit(1);
    }

    let opts = WatermarkOptions {
        font_path: cli.font,
        font_size: cli.font_size,
        margin: cli.margin,
        opacity: cli.opacity,
        threshold: cli.threshold,
    };

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&cli.input));

    let filename = cli.input.file_name().map_or_else(
        || cli.input.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    match watermark_file(&cli.input, &output, &cli.text, &opts) {
        Ok(()) => {
            if !cli.quiet {
                eprintln!("[OK] {filename} -> {}", output.display());
            }
        }
        Err(e) => {
            eprintln!("[FAIL] {filename}: {e}");
            process::exit(1);
        }
    }
}
