//! Tabular step data
//!
//! The first row is the header. Tables are read either as field:value rows
//! (`hashes`) or, for single-column lists, as the first cell of each data
//! row (`column_values`).

use indexmap::IndexMap;

/// Expected field → expected (unresolved) value, in column order
pub type Row = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build from string slices (handy in tests and fixtures)
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Split one `| a | b |` line into trimmed cells
    pub fn parse_line(line: &str) -> Option<Vec<String>> {
        let inner = line.trim().strip_prefix('|')?.strip_suffix('|')?;
        Some(inner.split('|').map(|cell| cell.trim().to_string()).collect())
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Data rows (header excluded)
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Data rows keyed by header
    pub fn hashes(&self) -> Vec<Row> {
        let headers = self.headers();
        self.data_rows()
            .iter()
            .map(|cells| {
                headers
                    .iter()
                    .cloned()
                    .zip(cells.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// First cell of every data row
    pub fn column_values(&self) -> Vec<String> {
        self.data_rows()
            .iter()
            .filter_map(|cells| cells.first().cloned())
            .collect()
    }
}
