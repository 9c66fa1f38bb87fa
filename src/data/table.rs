//! In-memory registry table: named columns over rows of typed cells.
//! Row order is file order; nothing here reorders rows except explicit sorts in `query`.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// One field of a registry row. Empty CSV fields load as `Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Float(f64),
    Null,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Null, empty text and NaN all count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(value) => value.is_empty(),
            Self::Float(value) => value.is_nan(),
        }
    }

    /// Text form used for equality and grouping. `None` for null.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(value) => Some(Cow::Borrowed(value.as_str())),
            Self::Float(value) => Some(Cow::Owned(value.to_string())),
            Self::Null => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Null => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from literal rows. Short rows are padded with nulls, long rows truncated.
    pub fn from_rows<C, R>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = Vec<Cell>>,
    {
        let mut table = Self::new(columns.into_iter().map(Into::into).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
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

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|cells| cells.get(index))
    }

    /// Same schema, only the rows for which `keep` returns true, in original order.
    pub fn retain_rows(&self, mut keep: impl FnMut(&[Cell]) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row.as_slice()))
                .cloned()
                .collect(),
        }
    }

    pub(crate) fn with_columns(self, columns: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), self.columns.len());
        Self {
            columns,
            rows: self.rows,
        }
    }

    pub(crate) fn with_rows(&self, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_pads_short_rows_with_null() {
        let table = Table::from_rows(["a", "b"], vec![vec![Cell::text("x")]]);
        assert_eq!(table.rows()[0], vec![Cell::text("x"), Cell::Null]);
    }

    #[test]
    fn missing_covers_null_empty_and_nan() {
        assert!(Cell::Null.is_missing());
        assert!(Cell::text("").is_missing());
        assert!(Cell::Float(f64::NAN).is_missing());
        assert!(!Cell::text("02118").is_missing());
        assert!(!Cell::Float(0.0).is_missing());
    }

    #[test]
    fn cell_serializes_untagged() {
        let cells = vec![Cell::text("02118"), Cell::Float(-71.5), Cell::Null];
        let json = serde_json::to_string(&cells).expect("cells should serialize");
        assert_eq!(json, r#"["02118",-71.5,null]"#);
    }
}
