//! CLI binary for mdtable2png.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! [`RenderStyle`] and a [`TableConverter`] and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mdtable2png::{
    has_tables, writer, AtomicFileWriter, ConversionProgressCallback, PngRenderer, RenderStyle,
    TableConverter,
};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar over the document's tables plus one log
/// line per written image.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_tables: usize) {
        let style = ProgressStyle::with_template(
            "{prefix:.bold}  [{bar:32.green/238}] {pos:>3}/{len} tables  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_length(total_tables as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
    }

    fn on_table_start(&self, n: usize, _total: usize) {
        self.bar.set_message(format!("table {n}"));
    }

    fn on_table_complete(&self, n: usize, total: usize, path: &Path, bytes: usize) {
        self.bar.println(format!(
            "  {} Table {:>3}/{:<3}  {}  {}",
            green("✓"),
            n,
            total,
            path.display(),
            dim(&format!("{bytes} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_tables: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} table(s) rendered",
            green("✔"),
            bold(&total_tables.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert and print the rewritten Markdown
  mdtable2png report.md

  # Write to a file, images under ./report_images/report_table_<n>.png
  mdtable2png report.md -o report.out.md --images-dir report_images

  # Read from stdin with an explicit file-name seed
  cat notes.md | mdtable2png - --seed notes

  # Only check whether a document contains tables (exit code 0 = yes)
  mdtable2png --check report.md

  # Machine-readable summary
  mdtable2png --json report.md > result.json

ENVIRONMENT VARIABLES:
  MDTABLE2PNG_OUTPUT      Default for --output
  MDTABLE2PNG_IMAGES_DIR  Default for --images-dir
  MDTABLE2PNG_SEED        Default for --seed
  MDTABLE2PNG_FONT_SIZE   Default for --font-size
  MDTABLE2PNG_PADDING     Default for --padding
  RUST_LOG                Overrides the log filter chosen by -v / -q
"#;

/// Replace Markdown pipe tables with rendered PNG images.
#[derive(Parser, Debug)]
#[command(
    name = "mdtable2png",
    version,
    about = "Replace Markdown pipe tables with rendered PNG images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file to convert, or `-` for stdin.
    input: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "MDTABLE2PNG_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory that receives the table images.
    #[arg(long, env = "MDTABLE2PNG_IMAGES_DIR", default_value = "images")]
    images_dir: PathBuf,

    /// Image file-name prefix. Defaults to the input file stem.
    #[arg(long, env = "MDTABLE2PNG_SEED")]
    seed: Option<String>,

    /// Text size in pixels (8–72).
    #[arg(long, env = "MDTABLE2PNG_FONT_SIZE", default_value_t = 18.0)]
    font_size: f32,

    /// Horizontal cell padding in pixels; vertical padding is two thirds of it.
    #[arg(long, env = "MDTABLE2PNG_PADDING", default_value_t = 12,
          value_parser = clap::value_parser!(u32).range(0..=200))]
    padding: u32,

    /// Exit 0 if the input contains a table, 1 otherwise. Writes nothing.
    #[arg(long)]
    check: bool,

    /// Print the conversion result as JSON instead of Markdown.
    #[arg(long, env = "MDTABLE2PNG_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDTABLE2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDTABLE2PNG_QUIET")]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
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

    let text = read_input(&cli.input)?;

    // ── Check-only mode ──────────────────────────────────────────────────
    if cli.check {
        let found = has_tables(&text);
        if !cli.quiet {
            eprintln!(
                "{}: {}",
                cli.input,
                if found { "contains tables" } else { "no tables" }
            );
        }
        return Ok(if found {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    // ── Build converter ──────────────────────────────────────────────────
    let style = build_style(&cli)?;
    let mut converter = TableConverter::new(PngRenderer::new(style), AtomicFileWriter);
    if !cli.quiet && !cli.json {
        converter = converter.with_progress(CliProgressCallback::new());
    }

    let seed = cli.seed.clone().unwrap_or_else(|| default_seed(&cli.input));

    // ── Run conversion ───────────────────────────────────────────────────
    let output = converter
        .convert(&text, &cli.images_dir, &seed)
        .context("Conversion failed")?;

    if let Some(ref output_path) = cli.output {
        writer::write_text_atomic(output_path, &output.markdown)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.output.is_none() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}  {} table(s)  {} bytes  {}ms{}",
            green("✔"),
            output.stats.tables,
            output.stats.total_bytes,
            output.stats.duration_ms,
            cli.output
                .as_ref()
                .map(|p| format!("  →  {}", bold(&p.display().to_string())))
                .unwrap_or_default(),
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Read the input document from a file or stdin.
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

/// File stem of the input, or empty for stdin.
fn default_seed(input: &str) -> String {
    if input == "-" {
        return String::new();
    }
    Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Map CLI args to `RenderStyle`.
fn build_style(cli: &Cli) -> Result<RenderStyle> {
    RenderStyle::builder()
        .font_size(cli.font_size)
        .padding(cli.padding, cli.padding * 2 / 3)
        .build()
        .context("Invalid style")
}
