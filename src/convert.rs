//! Conversion entry points.
//!
//! [`convert_tables_to_images`] is the simple API: default renderer, atomic
//! file writes, `(text, paths)` result. [`TableConverter`] is the same
//! operation with the renderer and file writer injected, plus progress
//! events and a richer [`ConversionOutput`].

use crate::error::{BlockContext, TableImageError};
use crate::output::{
    ArtifactRecord, ConversionOutput, ConversionStats, ImageFormat, RenderedArtifact,
};
use crate::pipeline::detect::{self, TableBlock};
use crate::pipeline::parse;
use crate::pipeline::render::{PngRenderer, Renderer};
use crate::pipeline::splice;
use crate::progress::ProgressCallback;
use crate::writer::{self, AtomicFileWriter, FileWriter};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

pub use crate::pipeline::detect::has_tables;

static RE_UNSAFE_SEED_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Replace every pipe table in `text` with a PNG image reference.
///
/// Images are written to `output_dir` as `<name_seed>_table_<n>.png`
/// (`table_<n>.png` when the seed is empty). Returns the rewritten text and
/// the image paths in document order.
///
/// Text without tables is returned unchanged and nothing is created on disk.
///
/// # Example
/// ```rust,no_run
/// use mdtable2png::convert_tables_to_images;
///
/// let doc = "Scores:\n\n| Team | W |\n|---|---|\n| Iowa | 22 |\n";
/// let (text, images) = convert_tables_to_images(doc, "images", "scores")?;
/// assert_eq!(images.len(), 1);
/// assert!(text.contains("![Table 1](images/scores_table_1.png)"));
/// # Ok::<(), mdtable2png::TableImageError>(())
/// ```
pub fn convert_tables_to_images(
    text: &str,
    output_dir: impl AsRef<Path>,
    name_seed: &str,
) -> Result<(String, Vec<PathBuf>), TableImageError> {
    let converter: TableConverter = TableConverter::default();
    converter
        .convert(text, output_dir.as_ref(), name_seed)
        .map(ConversionOutput::into_parts)
}

/// Convert a Markdown file and write the result atomically to `output`.
///
/// `output` may equal `input`; the original is only replaced once every image
/// has been written.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    name_seed: &str,
) -> Result<ConversionStats, TableImageError> {
    let input = input.as_ref();
    let output = output.as_ref();

    let text = std::fs::read_to_string(input).map_err(|e| TableImageError::InputRead {
        path: input.to_path_buf(),
        source: e,
    })?;

    let converter: TableConverter = TableConverter::default();
    let result = converter.convert(&text, output_dir.as_ref(), name_seed)?;

    writer::write_text_atomic(output, &result.markdown).map_err(|e| {
        TableImageError::OutputWrite {
            path: output.to_path_buf(),
            source: e,
        }
    })?;

    Ok(result.stats)
}

/// File name of the `n`-th table image for `seed`.
///
/// Seed characters outside `[A-Za-z0-9_-]` become `_`, so names are unique
/// per table within one call, but distinct seeds such as `"a b"` and `"a_b"`
/// share a file name. Use distinct sanitised seeds, or distinct output
/// directories, for documents that must not overwrite each other.
pub fn artifact_file_name(seed: &str, n: usize, format: ImageFormat) -> String {
    let seed = RE_UNSAFE_SEED_CHAR.replace_all(seed, "_");
    let ext = format.extension();
    if seed.is_empty() {
        format!("table_{n}.{ext}")
    } else {
        format!("{seed}_table_{n}.{ext}")
    }
}

/// Table-to-image conversion with injected capabilities.
pub struct TableConverter<R = PngRenderer, W = AtomicFileWriter> {
    renderer: R,
    writer: W,
    progress: Option<ProgressCallback>,
}

impl Default for TableConverter {
    fn default() -> Self {
        Self::new(PngRenderer::default(), AtomicFileWriter)
    }
}

impl<R: Renderer, W: FileWriter> TableConverter<R, W> {
    pub fn new(renderer: R, writer: W) -> Self {
        Self {
            renderer,
            writer,
            progress: None,
        }
    }

    /// Receive per-table events during [`TableConverter::convert`].
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Replace every table in `text` with an image reference.
    ///
    /// All tables are parsed and rendered before anything touches the file
    /// system, so a malformed table leaves no images behind.
    pub fn convert(
        &self,
        text: &str,
        output_dir: &Path,
        name_seed: &str,
    ) -> Result<ConversionOutput, TableImageError> {
        let start = Instant::now();

        // ── Step 1: Detect ───────────────────────────────────────────────
        if !detect::has_tables(text) {
            debug!("No tables found; returning input unchanged");
            return Ok(ConversionOutput {
                markdown: text.to_string(),
                artifacts: Vec::new(),
                stats: ConversionStats {
                    duration_ms: start.elapsed().as_millis() as u64,
                    ..ConversionStats::default()
                },
            });
        }

        let blocks = detect::locate_blocks(text);
        let total = blocks.len();
        info!("Found {} table(s)", total);
        if let Some(ref cb) = self.progress {
            cb.on_conversion_start(total);
        }

        // ── Step 2: Parse and render every block ─────────────────────────
        let lines: Vec<&str> = text.lines().collect();
        let mut pending = Vec::with_capacity(total);
        for (i, block) in blocks.iter().enumerate() {
            let n = i + 1;
            if let Some(ref cb) = self.progress {
                cb.on_table_start(n, total);
            }

            let block_lines = lines.get(block.lines()).ok_or_else(|| {
                TableImageError::Internal(format!(
                    "table {n} spans lines {}..{} of a {}-line document",
                    block.start,
                    block.end,
                    lines.len()
                ))
            })?;
            let context = block_context(n, block, block_lines);

            let table = parse::parse(block_lines).map_err(|source| {
                TableImageError::MalformedTable {
                    block: context.clone(),
                    source,
                }
            })?;
            let image = self
                .renderer
                .render(&table)
                .map_err(|source| TableImageError::Render {
                    block: context.clone(),
                    source,
                })?;
            debug!(
                "Table {}: {} columns, {} rows → {}x{} px",
                n,
                table.column_count(),
                table.row_count(),
                image.width,
                image.height
            );

            let format = self.renderer.format();
            let record = ArtifactRecord {
                index: n,
                path: output_dir.join(artifact_file_name(name_seed, n, format)),
                start_line: block.start,
                end_line: block.end,
                width: image.width,
                height: image.height,
                size_bytes: image.bytes.len(),
            };
            let artifact = RenderedArtifact {
                path: record.path.clone(),
                format,
                bytes: image.bytes,
            };
            pending.push((record, artifact, context));
        }

        // ── Step 3: Write artifacts ──────────────────────────────────────
        if let Err(source) = self.writer.create_dir_all(output_dir) {
            let block = pending
                .first()
                .map(|(_, _, context)| context.clone())
                .ok_or_else(|| TableImageError::Internal("no tables to write".into()))?;
            return Err(TableImageError::ArtifactWrite {
                block,
                path: output_dir.to_path_buf(),
                source,
            });
        }

        for (record, artifact, context) in &pending {
            self.writer
                .write(&artifact.path, &artifact.bytes)
                .map_err(|source| TableImageError::ArtifactWrite {
                    block: context.clone(),
                    path: artifact.path.clone(),
                    source,
                })?;
            debug!("Wrote {} ({})", artifact.path.display(), artifact.format.mime_type());
            if let Some(ref cb) = self.progress {
                cb.on_table_complete(record.index, total, &artifact.path, record.size_bytes);
            }
        }

        // ── Step 4: Splice references ────────────────────────────────────
        let replacements: Vec<(TableBlock, String)> = blocks
            .iter()
            .zip(&pending)
            .map(|(block, (record, _, _))| {
                (*block, splice::image_reference(record.index, &record.path))
            })
            .collect();
        let markdown = splice::splice(text, &replacements);

        let artifacts: Vec<ArtifactRecord> = pending.into_iter().map(|(r, _, _)| r).collect();
        let stats = ConversionStats {
            tables: artifacts.len(),
            total_bytes: artifacts.iter().map(|a| a.size_bytes).sum(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Converted {} table(s), {} bytes of images, {}ms",
            stats.tables, stats.total_bytes, stats.duration_ms
        );
        if let Some(ref cb) = self.progress {
            cb.on_conversion_complete(total);
        }

        Ok(ConversionOutput {
            markdown,
            artifacts,
            stats,
        })
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn block_context(index: usize, block: &TableBlock, lines: &[&str]) -> BlockContext {
    BlockContext {
        index,
        start_line: block.start,
        end_line: block.end,
        raw: lines.join("\n"),
    }
}
