//! Output types for table-to-image conversion.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Image encoding of a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
        }
    }

    /// Leading signature bytes of an encoded file.
    pub fn magic(self) -> &'static [u8] {
        match self {
            ImageFormat::Png => &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
        }
    }
}

/// An encoded table image paired with its destination, before it is written.
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

/// What was written for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// 1-based table number, as used in the reference line.
    pub index: usize,
    pub path: PathBuf,
    /// First line of the source block (0-based, inclusive).
    pub start_line: usize,
    /// Line after the source block (0-based, exclusive).
    pub end_line: usize,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

/// Summary statistics for a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub tables: usize,
    pub total_bytes: usize,
    pub duration_ms: u64,
}

/// The result of converting a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The document with every table replaced by an image reference.
    pub markdown: String,
    /// One record per table, in document order.
    pub artifacts: Vec<ArtifactRecord>,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Paths of the written images, in document order.
    pub fn artifact_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.artifacts.iter().map(|a| a.path.as_path())
    }

    /// Split into the rewritten text and the list of written paths.
    pub fn into_parts(self) -> (String, Vec<PathBuf>) {
        let paths = self.artifacts.into_iter().map(|a| a.path).collect();
        (self.markdown, paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_format_details() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
        assert_eq!(&ImageFormat::Png.magic()[1..4], b"PNG");
    }

    #[test]
    fn into_parts_keeps_order() {
        let record = |i: usize| ArtifactRecord {
            index: i,
            path: PathBuf::from(format!("t_{i}.png")),
            start_line: 0,
            end_line: 2,
            width: 10,
            height: 10,
            size_bytes: 100,
        };
        let output = ConversionOutput {
            markdown: "md".into(),
            artifacts: vec![record(1), record(2)],
            stats: ConversionStats::default(),
        };
        assert_eq!(output.artifact_paths().count(), 2);
        let (md, paths) = output.into_parts();
        assert_eq!(md, "md");
        assert_eq!(paths, vec![PathBuf::from("t_1.png"), PathBuf::from("t_2.png")]);
    }

    #[test]
    fn stats_serialize() {
        let stats = ConversionStats {
            tables: 2,
            total_bytes: 4096,
            duration_ms: 12,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"tables\":2"));
    }
}
