//! Table parsing: raw block lines → [`ParsedTable`].
//!
//! The column count is fixed by the header row. Body rows and the separator's
//! alignment list are normalised to that count: short rows are padded with
//! empty cells, long rows are truncated. Malformed body rows therefore never
//! fail a conversion; only a missing or invalid separator does.

use crate::error::ParseError;
use crate::pipeline::detect::{is_separator_cell, split_row};
use serde::{Deserialize, Serialize};

/// Horizontal alignment of a column, taken from the separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// `:---`
    Left,
    /// `:---:`
    Center,
    /// `---:`
    Right,
    /// `---` (rendered left)
    #[default]
    None,
}

impl Alignment {
    /// Read the alignment from one separator cell. The cell must already
    /// satisfy the separator grammar.
    pub fn from_separator_cell(cell: &str) -> Self {
        match (cell.starts_with(':'), cell.len() > 1 && cell.ends_with(':')) {
            (true, true) => Alignment::Center,
            (false, true) => Alignment::Right,
            (true, false) => Alignment::Left,
            (false, false) => Alignment::None,
        }
    }

    /// The alignment actually used for drawing.
    pub fn effective(self) -> Self {
        match self {
            Alignment::None => Alignment::Left,
            other => other,
        }
    }
}

/// A pipe table as a rectangular grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub header: Vec<String>,
    /// One entry per header column.
    pub alignments: Vec<Alignment>,
    /// Body rows, each exactly `header.len()` cells long.
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the cells of column `col`, header first.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.header.get(col))
            .chain(self.rows.iter().map(move |row| row.get(col)))
            .flatten()
            .map(String::as_str)
    }
}

/// Parse the lines of one table block.
///
/// `block_lines[0]` is the header, `block_lines[1]` the separator, and every
/// further line a body row.
pub fn parse(block_lines: &[&str]) -> Result<ParsedTable, ParseError> {
    let (header_line, separator_line) = match block_lines {
        [header, separator, ..] => (*header, *separator),
        _ => return Err(ParseError::MissingSeparator),
    };

    if separator_line.trim().is_empty() {
        return Err(ParseError::EmptySeparator);
    }

    let header = split_row(header_line);
    let columns = header.len();

    let separator = split_row(separator_line);
    let mut alignments = Vec::with_capacity(columns);
    for (i, cell) in separator.iter().enumerate() {
        if !is_separator_cell(cell) {
            return Err(ParseError::InvalidSeparatorCell {
                column: i + 1,
                cell: cell.clone(),
            });
        }
        alignments.push(Alignment::from_separator_cell(cell));
    }
    alignments.resize(columns, Alignment::None);

    let rows = block_lines[2..]
        .iter()
        .map(|line| {
            let mut cells = split_row(line);
            cells.resize(columns, String::new());
            cells
        })
        .collect();

    Ok(ParsedTable {
        header,
        alignments,
        rows,
    })
}
