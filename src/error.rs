//! Error types for the mdtable2png library.
//!
//! Three error types reflect the three places a conversion can go wrong:
//!
//! * [`ParseError`] — a located table block does not follow the pipe-table
//!   grammar (missing or invalid separator row).
//! * [`RenderError`] — the layout produced a canvas that cannot be drawn or
//!   the PNG encoder refused it.
//! * [`TableImageError`] — **Fatal**: returned from the top-level
//!   `convert*` functions. Wraps the two stage errors above together with a
//!   [`BlockContext`] naming the offending table, and adds the I/O failures.
//!
//! Nothing is retried: every input is deterministic, so a repeated call would
//! fail in exactly the same way.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Identifies the table block an error belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    /// 1-based position of the block in the document.
    pub index: usize,
    /// First line of the block (0-based, inclusive).
    pub start_line: usize,
    /// One past the last line of the block (0-based, exclusive).
    pub end_line: usize,
    /// The block's raw lines joined with `\n`.
    pub raw: String,
}

impl fmt::Display for BlockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table {} (lines {}..{})",
            self.index, self.start_line, self.end_line
        )
    }
}

/// All fatal errors returned by the mdtable2png library.
#[derive(Debug, Error)]
pub enum TableImageError {
    // ── Block errors ─────────────────────────────────────────────────────
    /// The block's separator row is missing or invalid.
    #[error("Malformed {block}: {source}\n{}", .block.raw)]
    MalformedTable {
        block: BlockContext,
        #[source]
        source: ParseError,
    },

    /// The block parsed but could not be rasterised.
    #[error("Failed to render {block}: {source}")]
    Render {
        block: BlockContext,
        #[source]
        source: RenderError,
    },

    // ── I/O errors ───────────────────────────────────────────────────────
    /// Could not create or write an image artifact.
    #[error("Failed to write image for {block} to '{path}': {source}")]
    ArtifactWrite {
        block: BlockContext,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not read the input Markdown file.
    #[error("Failed to read input file '{path}': {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TableImageError {
    /// The block this error refers to, if any.
    pub fn block(&self) -> Option<&BlockContext> {
        match self {
            TableImageError::MalformedTable { block, .. }
            | TableImageError::Render { block, .. }
            | TableImageError::ArtifactWrite { block, .. } => Some(block),
            _ => None,
        }
    }
}

/// Grammar failure inside a located table block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Fewer than two lines: there is no separator row at all.
    #[error("separator row is missing")]
    MissingSeparator,

    /// The separator row is blank.
    #[error("separator row has no cells")]
    EmptySeparator,

    /// A separator cell is not of the form `:?-+:?`.
    #[error("separator cell {column} is invalid: {cell:?}")]
    InvalidSeparatorCell { column: usize, cell: String },
}

/// Failure while laying out or encoding a table image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The layout has no drawable area or exceeds the size cap.
    #[error("degenerate canvas: {columns} columns, {width}x{height} px")]
    DegenerateCanvas {
        columns: usize,
        width: u64,
        height: u64,
    },

    /// An embedded font could not be loaded.
    #[error("font could not be loaded: {0}")]
    Font(String),

    /// The PNG encoder failed.
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
