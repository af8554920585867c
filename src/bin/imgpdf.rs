//! CLI binary for imgpdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PackConfig` / `RasterConfig` and writes the resulting files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use imgpdf::{
    inspect, pack_images_to_file, preview, rasterize_to_file, read_pdf, ConversionProgressCallback,
    ConvertError, ImageFormat, ImageSet, MarginPreset, Orientation, PackConfig, PageSelection,
    PageSize, ProgressCallback, RasterConfig, SortOrder,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar with one log line per finished item.
struct CliProgressCallback {
    bar: ProgressBar,
    /// "image" or "page", used in log lines.
    noun: &'static str,
}

impl CliProgressCallback {
    fn new(noun: &'static str) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar, noun })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_start(&self, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len}  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        self.bar.set_length(total as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
    }

    fn on_item_start(&self, item: usize, _total: usize) {
        self.bar.set_message(format!("{} {item}", self.noun));
    }

    fn on_item_complete(&self, item: usize, total: usize, bytes: usize) {
        self.bar.println(format!(
            "  {} {} {:>3}/{:<3}  {}",
            green("✓"),
            self.noun,
            item,
            total,
            dim(&format!("{:>8} bytes", bytes)),
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, item: usize, total: usize, error: &str) {
        self.bar.println(format!(
            "  {} {} {:>3}/{:<3}  {}",
            red("✗"),
            self.noun,
            item,
            total,
            red(error),
        ));
    }

    fn on_complete(&self, _total: usize) {
        self.bar.finish_and_clear();
    }
}

impl Drop for CliProgressCallback {
    fn drop(&mut self) {
        // Failed runs never reach on_complete.
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

// ── Arguments ────────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bundle photos into one PDF, one page each, orientation per photo
  imgpdf pack *.jpg --orientation auto --name holiday

  # Letter paper with one-inch margins, sorted by file name
  imgpdf pack scans/*.png --page-size letter --margin normal --sort name-asc

  # Rasterise pages 2-4 and 7 as JPEG at 150 DPI → report.zip
  imgpdf rasterize report.pdf --pages "2-4, 7" --format jpeg --dpi 150

  # Preview page 3 as PNG
  imgpdf preview report.pdf --page 3

  # Page count and sizes
  imgpdf inspect report.pdf --json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to the pdfium shared library
  RUST_LOG          Override the log filter (e.g. imgpdf=debug)
"#;

/// Bundle images into a PDF, or rasterise PDF pages into zipped images.
#[derive(Parser, Debug)]
#[command(
    name = "imgpdf",
    version,
    about = "Bundle images into a PDF, or rasterise PDF pages into zipped images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "IMGPDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "IMGPDF_QUIET")]
    quiet: bool,

    /// Disable progress bar.
    #[arg(long, global = true, env = "IMGPDF_NO_PROGRESS")]
    no_progress: bool,

    /// Print a JSON summary on stdout.
    #[arg(long, global = true, env = "IMGPDF_JSON")]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bundle images into a single PDF, one page per image.
    Pack(PackArgs),
    /// Rasterise PDF pages into a zip of images.
    Rasterize(RasterArgs),
    /// Render one PDF page to a PNG preview.
    Preview(PreviewArgs),
    /// Print page count and page sizes of a PDF.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct PackArgs {
    /// Image files, in page order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory to write the PDF into.
    #[arg(short, long, env = "IMGPDF_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// PDF file name (without .pdf).
    #[arg(long, env = "IMGPDF_NAME", default_value = "converted-document")]
    name: String,

    #[arg(long, env = "IMGPDF_PAGE_SIZE", value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    #[arg(long, env = "IMGPDF_ORIENTATION", value_enum, default_value = "portrait")]
    orientation: OrientationArg,

    #[arg(long, env = "IMGPDF_MARGIN", value_enum, default_value = "none")]
    margin: MarginArg,

    /// Custom margin in points; overrides --margin.
    #[arg(long, env = "IMGPDF_MARGIN_PT")]
    margin_pt: Option<f32>,

    /// Reorder images before assembly instead of using argument order.
    #[arg(long, env = "IMGPDF_SORT", value_enum)]
    sort: Option<SortArg>,
}

#[derive(Args, Debug)]
struct RasterArgs {
    /// PDF file.
    input: PathBuf,

    /// Directory to write the zip into.
    #[arg(short, long, env = "IMGPDF_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Page selection: all, or e.g. "1-3, 5; 8".
    #[arg(long, env = "IMGPDF_PAGES", default_value = "all")]
    pages: String,

    #[arg(long, env = "IMGPDF_FORMAT", value_enum, default_value = "png")]
    format: FormatArg,

    /// Rendering DPI (presets: 150, 300, 600).
    #[arg(long, env = "IMGPDF_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(36..=1200))]
    dpi: u32,

    /// JPEG quality (1–100).
    #[arg(long, env = "IMGPDF_JPEG_QUALITY", default_value_t = 92,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Cap either rendered dimension at this many pixels.
    #[arg(long, env = "IMGPDF_MAX_PIXELS")]
    max_pixels: Option<u32>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "IMGPDF_PASSWORD")]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// PDF file.
    input: PathBuf,

    /// 1-indexed page to render.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Output PNG path. Default: {name}-preview-{page}.png
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, env = "IMGPDF_PASSWORD")]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// PDF file.
    input: PathBuf,

    #[arg(long, env = "IMGPDF_PASSWORD")]
    password: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    A4,
    Letter,
    A3,
    A5,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::A5 => PageSize::A5,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrientationArg {
    Portrait,
    Landscape,
    Auto,
}

impl From<OrientationArg> for Orientation {
    fn from(v: OrientationArg) -> Self {
        match v {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
            OrientationArg::Auto => Orientation::Auto,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MarginArg {
    None,
    Narrow,
    Moderate,
    Normal,
    Wide,
}

impl From<MarginArg> for MarginPreset {
    fn from(v: MarginArg) -> Self {
        match v {
            MarginArg::None => MarginPreset::None,
            MarginArg::Narrow => MarginPreset::Narrow,
            MarginArg::Moderate => MarginPreset::Moderate,
            MarginArg::Normal => MarginPreset::Normal,
            MarginArg::Wide => MarginPreset::Wide,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    NameAsc,
    NameDesc,
    DateAsc,
    DateDesc,
    CreatedAsc,
    CreatedDesc,
}

impl From<SortArg> for SortOrder {
    fn from(v: SortArg) -> Self {
        match v {
            SortArg::NameAsc => SortOrder::NameAsc,
            SortArg::NameDesc => SortOrder::NameDesc,
            SortArg::DateAsc => SortOrder::ModifiedAsc,
            SortArg::DateDesc => SortOrder::ModifiedDesc,
            SortArg::CreatedAsc => SortOrder::CreatedAsc,
            SortArg::CreatedDesc => SortOrder::CreatedDesc,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<FormatArg> for ImageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Jpeg => ImageFormat::Jpeg,
            FormatArg::Webp => ImageFormat::Webp,
        }
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", red("✘"), err);
            let user_error = err
                .downcast_ref::<ConvertError>()
                .is_some_and(ConvertError::is_user_error);
            if user_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    match &cli.command {
        Command::Pack(args) => run_pack(cli, args, show_progress).await,
        Command::Rasterize(args) => run_rasterize(cli, args, show_progress).await,
        Command::Preview(args) => run_preview(cli, args).await,
        Command::Inspect(args) => run_inspect(cli, args).await,
    }
}

async fn run_pack(cli: &Cli, args: &PackArgs, show_progress: bool) -> Result<()> {
    let mut images = ImageSet::new();
    images
        .add_paths(&args.inputs)
        .context("Failed to read images")?;
    if images.is_empty() {
        return Err(ConvertError::NoImages.into());
    }

    let margin = match args.margin_pt {
        Some(points) => MarginPreset::Custom(points),
        None => args.margin.into(),
    };
    let mut builder = PackConfig::builder()
        .file_name(&args.name)
        .page_size(args.page_size.into())
        .orientation(args.orientation.into())
        .margin(margin);
    if let Some(order) = args.sort {
        builder = builder.sort(order.into());
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new("image") as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    let (path, output) = pack_images_to_file(&images, &args.output_dir, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} pages  {}ms  →  {}",
            green("✔"),
            output.stats.processed_items,
            output.stats.total_duration_ms,
            bold(&path.display().to_string()),
        );
    }
    Ok(())
}

async fn run_rasterize(cli: &Cli, args: &RasterArgs, show_progress: bool) -> Result<()> {
    let source = read_pdf(&args.input)?;

    let mut builder = RasterConfig::builder()
        .pages(PageSelection::parse(&args.pages))
        .format(args.format.into())
        .dpi(args.dpi)
        .jpeg_quality(args.jpeg_quality);
    if let Some(px) = args.max_pixels {
        builder = builder.max_rendered_pixels(px);
    }
    if let Some(ref pwd) = args.password {
        builder = builder.password(pwd);
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new("page") as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    let (path, output) = rasterize_to_file(&source, &args.output_dir, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {}/{} pages  {}ms  →  {}",
            green("✔"),
            output.stats.processed_items,
            output.stats.total_items,
            output.stats.total_duration_ms,
            bold(&path.display().to_string()),
        );
    }
    Ok(())
}

async fn run_preview(cli: &Cli, args: &PreviewArgs) -> Result<()> {
    let source = read_pdf(&args.input)?;
    let image = preview(&source, args.page, args.password.as_deref())
        .await
        .context("Preview failed")?;

    let path = args.output.clone().unwrap_or_else(|| {
        let base = imgpdf::pipeline::rasterize::base_name(&source.name);
        PathBuf::from(format!("{base}-preview-{}.png", args.page))
    });
    image
        .save_with_format(&path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write preview to {}", path.display()))?;

    if !cli.quiet {
        eprintln!(
            "{}  page {}  {}x{} px  →  {}",
            green("✔"),
            args.page,
            image.width(),
            image.height(),
            bold(&path.display().to_string()),
        );
    }
    Ok(())
}

async fn run_inspect(cli: &Cli, args: &InspectArgs) -> Result<()> {
    let source = read_pdf(&args.input)?;
    let info = inspect(&source, args.password.as_deref())
        .await
        .context("Failed to inspect PDF")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&info).context("Failed to serialize metadata")?
        );
    } else {
        println!("File:   {}", info.name);
        println!("Pages:  {}", info.page_count);
        for (idx, size) in info.page_sizes.iter().enumerate() {
            println!(
                "  {:>4}  {:.1} x {:.1} pt  {:?}",
                idx + 1,
                size.width,
                size.height,
                size.orientation()
            );
        }
    }
    Ok(())
}
