//! Tab-delimited metadata sheets
//!
//! First line is the header, every further line is one row. Cells are split
//! on `\t` and trimmed.

use std::io::BufRead;

use crate::{Error, Result};

/// Byte order mark some spreadsheet exports put before the first header.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Normalised form of a header cell: byte order mark and surrounding
/// whitespace removed, lowercased.
#[must_use]
pub fn normalize_column(name: &str) -> String {
    name.trim_start_matches(BYTE_ORDER_MARK).trim().to_lowercase()
}

/// One data line of a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    line: usize,
    raw: String,
    cells: Vec<String>,
}

impl SheetRow {
    fn parse(line: usize, raw: &str) -> Self {
        let raw = raw.trim_end_matches(['\r', '\n']);
        Self {
            line,
            raw: raw.to_string(),
            cells: raw.split('\t').map(|cell| cell.trim().to_string()).collect(),
        }
    }

    /// 1-based line number in the upload (the header is line 1).
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The line as uploaded.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed cells.
    #[must_use]
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell at `index`; empty when the row is shorter.
    #[must_use]
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }

    /// Whether every cell is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(String::is_empty)
    }
}

/// A parsed sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    header: Vec<String>,
    rows: Vec<SheetRow>,
}

impl Sheet {
    /// Parse a sheet from text.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingHeader` if the text has no first line.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let header = lines.next().ok_or(Error::MissingHeader)?;
        Ok(Self {
            header: SheetRow::parse(1, header.trim_start_matches(BYTE_ORDER_MARK)).cells,
            rows: lines
                .enumerate()
                .map(|(i, raw)| SheetRow::parse(i + 2, raw))
                .collect(),
        })
    }

    /// Read and parse a sheet.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` on read failure, `Error::MissingHeader` on empty
    /// input.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut header = None;
        let mut rows = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if header.is_none() {
                header = Some(SheetRow::parse(1, line.trim_start_matches(BYTE_ORDER_MARK)).cells);
            } else {
                rows.push(SheetRow::parse(i + 1, &line));
            }
        }
        Ok(Self {
            header: header.ok_or(Error::MissingHeader)?,
            rows,
        })
    }

    /// Trimmed header cells.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows in upload order.
    #[must_use]
    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    /// Index of a header column, compared by [`normalize_column`].
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = normalize_column(name);
        self.header
            .iter()
            .position(|column| normalize_column(column) == name)
    }

    /// Whether the sheet has no non-blank data row.
    #[must_use]
    pub fn has_no_data(&self) -> bool {
        self.rows.iter().all(SheetRow::is_blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_cells() {
        let sheet = Sheet::parse("a\t B \r\n 1 \t2\n").unwrap();
        assert_eq!(sheet.header(), ["a", "B"]);
        assert_eq!(sheet.rows().len(), 1);
        assert_eq!(sheet.rows()[0].cells(), ["1", "2"]);
        assert_eq!(sheet.rows()[0].line(), 2);
        assert_eq!(sheet.column_index("b"), Some(1));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(Sheet::parse(""), Err(Error::MissingHeader)));
        assert!(matches!(Sheet::read(&b""[..]), Err(Error::MissingHeader)));
    }

    #[test]
    fn test_read_matches_parse() {
        let text = "x\ty\n1\t2\n\t\n";
        assert_eq!(Sheet::read(text.as_bytes()).unwrap(), Sheet::parse(text).unwrap());
    }

    #[test]
    fn test_short_row_cells_default_empty() {
        let sheet = Sheet::parse("a\tb\tc\nonly").unwrap();
        let row = &sheet.rows()[0];
        assert_eq!(row.cell(0), "only");
        assert_eq!(row.cell(2), "");
        assert!(!sheet.has_no_data());
    }

    #[test]
    fn test_header_byte_order_mark_is_stripped() {
        let text = "\u{feff}QBiC Sample Id\tÄnderung\nQ1\tx";
        let parsed = Sheet::parse(text).unwrap();
        assert_eq!(parsed.header()[0], "QBiC Sample Id");
        assert_eq!(parsed.column_index("qbic sample id"), Some(0));
        assert_eq!(parsed.column_index("änderung"), Some(1));
        assert_eq!(Sheet::read(text.as_bytes()).unwrap(), parsed);
        assert_eq!(normalize_column("\u{feff} Instrument "), "instrument");
    }
}
