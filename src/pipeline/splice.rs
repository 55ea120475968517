//! Document splicing: replace each table block with one image-reference line.
//!
//! The output is built by a single forward copy over the original lines, so
//! earlier replacements never shift the offsets of later blocks. Lines outside
//! every block are copied byte-for-byte, terminators included.

use crate::pipeline::detect::TableBlock;
use std::path::Path;

/// Format the reference line for the `n`-th table (1-based).
///
/// The location always uses forward slashes, whatever the host platform.
pub fn image_reference(n: usize, location: &Path) -> String {
    format!("![Table {n}]({})", forward_slash(location))
}

/// Render a path with `/` separators.
pub fn forward_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Replace every block's line range with its reference line.
///
/// `replacements` must be in document order and non-overlapping, as produced
/// by [`crate::pipeline::detect::locate_blocks`]. The reference line inherits
/// the line terminator of the block's last line.
pub fn splice(original: &str, replacements: &[(TableBlock, String)]) -> String {
    let lines: Vec<&str> = original.split_inclusive('\n').collect();
    let mut out = String::with_capacity(original.len());
    let mut cursor = 0;

    for (block, reference) in replacements {
        let start = block.start.clamp(cursor, lines.len());
        let end = block.end.clamp(start, lines.len());

        lines[cursor..start].iter().for_each(|line| out.push_str(line));
        out.push_str(reference);
        if end > start {
            out.push_str(line_terminator(lines[end - 1]));
        }
        cursor = end;
    }
    lines[cursor..].iter().for_each(|line| out.push_str(line));

    out
}

fn line_terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::detect::locate_blocks;
    use std::path::PathBuf;

    fn refs(text: &str) -> Vec<(TableBlock, String)> {
        locate_blocks(text)
            .into_iter()
            .enumerate()
            .map(|(i, b)| (b, format!("![Table {}](t{}.png)", i + 1, i + 1)))
            .collect()
    }

    #[test]
    fn reference_format() {
        let r = image_reference(3, &PathBuf::from("out/dir/seed_table_3.png"));
        assert_eq!(r, "![Table 3](out/dir/seed_table_3.png)");
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        assert_eq!(forward_slash(Path::new(r"G:\ai\images\t.png")), "G:/ai/images/t.png");
    }

    #[test]
    fn replaces_single_table() {
        let text = "before\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\nafter\n";
        let out = splice(text, &refs(text));
        assert_eq!(out, "before\n\n![Table 1](t1.png)\n\nafter\n");
    }

    #[test]
    fn replaces_multiple_tables_in_order() {
        let text = "| a |\n|---|\n| 1 |\nmid\n| b |\n|---|\nend";
        let out = splice(text, &refs(text));
        assert_eq!(out, "![Table 1](t1.png)\nmid\n![Table 2](t2.png)\nend");
    }

    #[test]
    fn adjacent_tables_without_gap() {
        let text = "| a |\n|---|\nnot a row\n| b |\n|---|\n";
        let out = splice(text, &refs(text));
        assert_eq!(out, "![Table 1](t1.png)\nnot a row\n![Table 2](t2.png)\n");
    }

    #[test]
    fn table_at_eof_without_newline() {
        let text = "intro\n| a |\n|---|\n| 1 |";
        let out = splice(text, &refs(text));
        assert_eq!(out, "intro\n![Table 1](t1.png)");
    }

    #[test]
    fn crlf_preserved() {
        let text = "intro\r\n\r\n| a |\r\n|---|\r\n| 1 |\r\n\r\noutro\r\n";
        let out = splice(text, &refs(text));
        assert_eq!(out, "intro\r\n\r\n![Table 1](t1.png)\r\n\r\noutro\r\n");
    }

    #[test]
    fn no_replacements_is_identity() {
        let text = "line one\n\n  indented  \ntrailing spaces   \n";
        assert_eq!(splice(text, &[]), text);
    }

    #[test]
    fn removed_and_inserted_line_counts() {
        let text = "p\n| a |\n|---|\n| 1 |\n| 2 |\nq\n";
        let replacements = refs(text);
        let out = splice(text, &replacements);
        let removed: usize = replacements.iter().map(|(b, _)| b.len()).sum();
        assert_eq!(
            out.lines().count(),
            text.lines().count() - removed + replacements.len()
        );
    }
}
