use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use artcat::config::{
    load_settings, save_settings, FontFamily, LogoMode, LogoPosition, Orientation, PageFormat,
    Rgb, UserSettings, DEFAULT_SETTINGS_PATH,
};
use artcat::worker::MAX_WORKERS;
use artcat::{
    collect_images, generate_catalog, AssetOutcome, BatchConfig, BatchExtractor, OcrExtractor,
    TesseractEngine, OUTPUT_FILE_NAME,
};
use clap::{Args, Parser, Subcommand};
use log::info;

/// Builds a demo PDF catalog from artwork images, one page per image.
#[derive(Parser, Debug)]
#[command(name = "artcat")]
#[command(version)]
#[command(about = "Artwork catalog generator", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract text from images and write the catalog PDF
    Build(BuildArgs),

    /// Inspect or change the stored default settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Image files or directories of images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Where to write the PDF
    #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
    pub output: PathBuf,

    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    pub settings: PathBuf,

    /// OCR language(s), e.g. "eng", "spa" or "eng+spa"
    #[arg(long)]
    pub lang: Option<String>,

    /// Maximum concurrent OCR workers
    #[arg(long, default_value_t = MAX_WORKERS)]
    pub workers: usize,

    /// Give up when no extraction completes within this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Tesseract data directory
    #[arg(long)]
    pub tessdata: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the effective settings
    Show {
        #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
        settings: PathBuf,
    },

    /// Merge the given values into the stored settings
    Save(SaveArgs),
}

#[derive(Args, Debug, Default)]
pub struct SaveArgs {
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    pub settings: PathBuf,

    /// "A4" or "letter"
    #[arg(long)]
    pub page_format: Option<String>,

    /// "P" or "L"
    #[arg(long)]
    pub orientation: Option<String>,

    /// "default" or "custom"
    #[arg(long)]
    pub logo_mode: Option<String>,

    #[arg(long)]
    pub logo_path: Option<String>,

    /// Logo width in mm (10-80)
    #[arg(long)]
    pub logo_width: Option<f64>,

    /// top-left, top-center, top-right, bottom-left, bottom-center or bottom-right
    #[arg(long)]
    pub logo_position: Option<String>,

    /// Arial, Times or Courier
    #[arg(long)]
    pub title_font: Option<String>,

    #[arg(long)]
    pub title_size: Option<f32>,

    #[arg(long)]
    pub body_font: Option<String>,

    #[arg(long)]
    pub body_size: Option<f32>,

    /// "#RRGGBB"
    #[arg(long)]
    pub title_color: Option<String>,

    #[arg(long)]
    pub body_color: Option<String>,

    #[arg(long)]
    pub lang: Option<String>,

    #[arg(long)]
    pub show_file_name: Option<bool>,
}

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build(args) => build(args),
        Commands::Settings(SettingsCommand::Show { settings }) => show_settings(settings),
        Commands::Settings(SettingsCommand::Save(args)) => save(args),
    }
}

fn build(args: BuildArgs) -> Result<()> {
    let settings = load_settings(&args.settings);
    let language = args
        .lang
        .clone()
        .unwrap_or_else(|| settings.language().to_string());
    let layout = settings.to_layout_config();

    let images = collect_images(&args.inputs).context("Failed to collect input images")?;
    if images.is_empty() {
        bail!("No images found in the given inputs");
    }
    info!("Found {} images", images.len());

    let engine = match &args.tessdata {
        Some(path) => TesseractEngine::with_data_path(path.clone()),
        None => TesseractEngine::new(),
    };
    let extractor = OcrExtractor::new(Arc::new(engine), &language);
    let batch = BatchExtractor::with_config(
        extractor,
        BatchConfig {
            max_workers: args.workers,
            timeout: args.timeout_secs.map(Duration::from_secs),
        },
    );

    let document = generate_catalog(&batch, images, &layout)?;

    std::fs::write(&args.output, &document.bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} pages to {}",
        document.page_count(),
        args.output.display()
    );
    for page in document.degraded_pages() {
        let mut problems = Vec::new();
        if let AssetOutcome::Skipped { reason } = &page.logo {
            problems.push(format!("logo skipped ({})", reason));
        }
        if let AssetOutcome::Skipped { reason } = &page.artwork {
            problems.push(format!("artwork skipped ({})", reason));
        }
        if page.text_truncated {
            problems.push("text truncated".to_string());
        }
        println!("  page {} [{}]: {}", page.index + 1, page.name, problems.join(", "));
    }

    Ok(())
}

fn show_settings(path: PathBuf) -> Result<()> {
    let settings = load_settings(&path);
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn save(args: SaveArgs) -> Result<()> {
    let mut settings = load_settings(&args.settings);
    apply(&mut settings, &args)?;
    save_settings(&args.settings, &settings)
        .with_context(|| format!("Failed to save {}", args.settings.display()))?;
    println!("Saved settings to {}", args.settings.display());
    Ok(())
}

/// Validates each given flag and writes it into `settings`.
fn apply(settings: &mut UserSettings, args: &SaveArgs) -> Result<()> {
    if let Some(format) = &args.page_format {
        let Some(format) = PageFormat::from_name(format) else {
            bail!("Unknown page format '{}'", format);
        };
        settings.page_format = format.name().to_string();
    }
    if let Some(orientation) = &args.orientation {
        let Some(orientation) = Orientation::from_name(orientation) else {
            bail!("Unknown orientation '{}'", orientation);
        };
        settings.orientation = orientation.code().to_string();
    }
    if let Some(mode) = &args.logo_mode {
        settings.logo_mode = match mode.trim().to_lowercase().as_str() {
            "default" => LogoMode::Default,
            "custom" => LogoMode::Custom,
            other => bail!("Unknown logo mode '{}'", other),
        };
    }
    if let Some(path) = &args.logo_path {
        settings.logo_path = path.clone();
    }
    if let Some(width) = args.logo_width {
        settings.logo_width_mm = width;
    }
    if let Some(position) = &args.logo_position {
        settings.logo_position_key = position.parse::<LogoPosition>()?.key().to_string();
    }
    if let Some(family) = &args.title_font {
        settings.title_font_family = font_name(family)?;
    }
    if let Some(size) = args.title_size {
        settings.title_font_size = size;
    }
    if let Some(family) = &args.body_font {
        settings.body_font_family = font_name(family)?;
    }
    if let Some(size) = args.body_size {
        settings.body_font_size = size;
    }
    if let Some(hex) = &args.title_color {
        settings.title_color_hex = Rgb::from_hex(hex)?.to_hex();
    }
    if let Some(hex) = &args.body_color {
        settings.body_color_hex = Rgb::from_hex(hex)?.to_hex();
    }
    if let Some(lang) = &args.lang {
        settings.ocr_language = lang.clone();
    }
    if let Some(show) = args.show_file_name {
        settings.show_file_name = show;
    }
    Ok(())
}

fn font_name(name: &str) -> Result<String> {
    match FontFamily::from_name(name) {
        Some(family) => Ok(family.to_string()),
        None => bail!("Unsupported font family '{}'", name),
    }
}
