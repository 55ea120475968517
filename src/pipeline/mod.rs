//! Pipeline stages for table-to-image conversion.
//!
//! Each submodule implements exactly one transformation step, and every step
//! except rendering is a pure `&str`/slice function, which keeps them
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! detect ──▶ parse ──▶ render ──▶ encode ──▶ splice
//! (blocks)   (grid)    (pixels)   (PNG)      (new text)
//! ```
//!
//! 1. [`detect`] — find header/separator pairs and each table's line span
//! 2. [`parse`]  — split a span into header, alignments and padded body rows
//! 3. [`render`] — lay the grid out and rasterise it with embedded fonts
//! 4. [`encode`] — PNG-encode the raster
//! 5. [`splice`] — swap each span for a single `![Table n](path)` line

pub mod detect;
pub mod encode;
pub mod parse;
pub mod render;
pub mod splice;
