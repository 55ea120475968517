//! File-system access for conversion artifacts.
//!
//! The converter writes through [`FileWriter`] so tests can observe or fail
//! writes without touching disk. [`AtomicFileWriter`] writes each file to a
//! temporary sibling and renames it into place, so a crash never leaves a
//! half-written PNG under its final name.

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Destination for conversion artifacts.
pub trait FileWriter {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Write `bytes` to `path`, replacing any existing file.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

impl<W: FileWriter + ?Sized> FileWriter for &W {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        (**self).create_dir_all(dir)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        (**self).write(path, bytes)
    }
}

/// Writes via a temporary file in the target directory plus rename.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicFileWriter;

impl FileWriter for AtomicFileWriter {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        write_atomic(path, bytes)
    }
}

/// Atomically replace `path` with `bytes`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Atomically replace `path` with UTF-8 `text`.
pub fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    write_atomic(path, text.as_bytes())
}
