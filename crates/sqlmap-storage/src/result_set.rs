//! Raw query results: ordered column names shared by every row, each row
//! an ordered sequence of nullable raw byte values.

use std::collections::HashMap;

/// One cell: `None` is SQL NULL.
pub type Cell = Option<Vec<u8>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl ResultSet {
    /// Rows shorter than `columns` are padded with NULL, longer ones truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One column→string map per row, in row order. NULL maps to `""`;
    /// non-UTF-8 bytes are replaced lossily.
    pub fn to_dictionaries(&self) -> Vec<HashMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(column, cell)| {
                        let text = cell
                            .as_deref()
                            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                            .unwrap_or_default();
                        (column.clone(), text)
                    })
                    .collect()
            })
            .collect()
    }
}
