//! # mdtable2png
//!
//! Replace GitHub-style pipe tables in Markdown with rendered PNG images.
//!
//! Many Markdown consumers (chat clients, e-mail, slide tools) show pipe
//! tables as raw text. This crate finds every table, draws it as a framed
//! grid with a bold header band, writes the image next to the document, and
//! swaps the table's lines for a single `![Table n](path)` reference.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Detect  header + separator pairs, block line spans
//!  ├─ 2. Parse   cells, alignments, rows padded to the header width
//!  ├─ 3. Render  fixed-metric layout, ab_glyph text, imageproc shapes
//!  ├─ 4. Encode  PNG
//!  ├─ 5. Write   atomic temp-file + rename per image
//!  └─ 6. Splice  one reference line per block, all other bytes untouched
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdtable2png::{convert_tables_to_images, has_tables};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = std::fs::read_to_string("report.md")?;
//!     if has_tables(&doc) {
//!         let (text, images) = convert_tables_to_images(&doc, "report_images", "report")?;
//!         std::fs::write("report.md", text)?;
//!         eprintln!("{} table image(s) written", images.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Custom styling
//!
//! ```rust
//! use mdtable2png::{PngRenderer, RenderStyle, TableConverter, AtomicFileWriter};
//!
//! let style = RenderStyle::builder()
//!     .font_size(14.0)
//!     .padding(8, 4)
//!     .stripe_background(None)
//!     .build()
//!     .unwrap();
//! let converter = TableConverter::new(PngRenderer::new(style), AtomicFileWriter);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdtable2png` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mdtable2png = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod writer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RenderStyle, RenderStyleBuilder, Rgb};
pub use convert::{
    artifact_file_name, convert_file, convert_tables_to_images, has_tables, TableConverter,
};
pub use error::{BlockContext, ParseError, RenderError, TableImageError};
pub use output::{ArtifactRecord, ConversionOutput, ConversionStats, ImageFormat};
pub use pipeline::parse::{Alignment, ParsedTable};
pub use pipeline::render::{PngRenderer, RenderedImage, Renderer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use writer::{AtomicFileWriter, FileWriter};
