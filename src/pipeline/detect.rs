//! Table detection: find pipe-table blocks inside arbitrary prose.
//!
//! A table starts at a header row immediately followed by a separator row
//! (`|---|:---:|`). It then extends over every following line that still
//! contains an unescaped `|`, and ends at the first blank or pipe-free line.
//! This is the GFM rule minus the column-count check, which the parser
//! handles leniently instead.
//!
//! Line numbering follows [`str::lines`], so `\n` and `\r\n` documents index
//! identically; the splicer uses the same numbering.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static RE_SEPARATOR_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// A contiguous half-open line range `[start, end)` occupied by one table.
///
/// `start` is the header row, `start + 1` the separator row; the block always
/// spans at least those two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBlock {
    pub start: usize,
    pub end: usize,
}

impl TableBlock {
    pub fn lines(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of lines in the block (header + separator + body rows).
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of body rows below the separator.
    pub fn body_rows(&self) -> usize {
        self.len().saturating_sub(2)
    }
}

/// Return true iff the document contains at least one header/separator pair.
pub fn has_tables(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .windows(2)
        .any(|pair| is_header_row(pair[0]) && is_separator_row(pair[1]))
}

/// Locate every table block, top to bottom. Blocks never overlap.
pub fn locate_blocks(text: &str) -> Vec<TableBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i + 1 < lines.len() {
        if is_header_row(lines[i]) && is_separator_row(lines[i + 1]) {
            let start = i;
            let mut end = i + 2;
            while end < lines.len() && is_body_row(lines[end]) {
                end += 1;
            }
            blocks.push(TableBlock { start, end });
            i = end;
        } else {
            i += 1;
        }
    }

    blocks
}

/// A header row has an unescaped pipe and at least one non-empty cell.
pub fn is_header_row(line: &str) -> bool {
    has_unescaped_pipe(line) && split_row(line).iter().any(|cell| !cell.is_empty())
}

/// A separator row has an unescaped pipe and only `:?-+:?` cells.
pub fn is_separator_row(line: &str) -> bool {
    has_unescaped_pipe(line) && split_row(line).iter().all(|c| is_separator_cell(c))
}

/// A body row is any non-blank line with an unescaped pipe; this includes
/// every line whose trimmed form starts with `|`.
pub fn is_body_row(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && has_unescaped_pipe(trimmed)
}

pub(crate) fn is_separator_cell(cell: &str) -> bool {
    RE_SEPARATOR_CELL.is_match(cell)
}

pub(crate) fn has_unescaped_pipe(line: &str) -> bool {
    let mut escaped = false;
    for c in line.chars() {
        match c {
            '|' if !escaped => return true,
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    false
}

/// Split a table row into trimmed cells.
///
/// One leading and one trailing unescaped pipe are stripped first, so
/// `| a | b |` and `a | b` both yield `["a", "b"]`. `\|` stays inside the
/// cell as a literal `|`. Always returns at least one cell.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !ends_with_escape(rest) => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek().copied() {
                Some('|') => {
                    current.push('|');
                    chars.next();
                }
                Some('\\') => {
                    current.push_str("\\\\");
                    chars.next();
                }
                _ => current.push('\\'),
            },
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());

    cells
}

/// True when `s` ends in an odd number of backslashes.
fn ends_with_escape(s: &str) -> bool {
    s.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}
