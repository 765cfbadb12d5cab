//! In-memory columnar sales table
//!
use std::fmt;

use crate::error::{DatasetError, Result};

/// A single column of a [`SalesFrame`]
///
/// Columns read from a CSV file are always `Text`; derived columns carry their native type.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Integer(Vec<i64>),
    Boolean(Vec<bool>),
}

/// Borrowed view of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(x) => write!(f, "{}", x),
            Cell::Integer(x) => write!(f, "{}", x),
            Cell::Boolean(x) => write!(f, "{}", x),
        }
    }
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(x) => x.len(),
            Column::Integer(x) => x.len(),
            Column::Boolean(x) => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the stored type, used in log and error messages
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Integer(_) => "integer",
            Column::Boolean(_) => "boolean",
        }
    }

    /// Returns the cell at `row`, `None` if out of bounds
    pub fn get(&self, row: usize) -> Option<Cell<'_>> {
        match self {
            Column::Text(x) => x.get(row).map(|x| Cell::Text(x)),
            Column::Integer(x) => x.get(row).copied().map(Cell::Integer),
            Column::Boolean(x) => x.get(row).copied().map(Cell::Boolean),
        }
    }

    /// Iterate over all cells in row order
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> + '_ {
        (0..self.len()).filter_map(move |row| self.get(row))
    }

    fn select(&self, rows: std::ops::Range<usize>) -> Column {
        match self {
            Column::Text(x) => Column::Text(x[rows].to_vec()),
            Column::Integer(x) => Column::Integer(x[rows].to_vec()),
            Column::Boolean(x) => Column::Boolean(x[rows].to_vec()),
        }
    }
}

/// SalesFrame
///
/// An ordered collection of named, equally long columns. This is the in-memory form of a sales
/// CSV file: column names and row order are preserved exactly as read. No schema is enforced,
/// consumers look up the columns they need and fail if they are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesFrame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl SalesFrame {
    /// Create an empty table without columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, column)` pairs
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let mut frame = SalesFrame::new();
        for (name, column) in columns {
            let name = name.into();
            if frame.has_column(&name) {
                return Err(DatasetError::DuplicateColumn(name));
            }
            frame.push_column(name, column)?;
        }

        Ok(frame)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|idx| &self.columns[idx])
    }

    /// Like [`column`](Self::column), but fails with `MissingColumn`
    pub fn try_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    }

    /// Iterate over `(name, column)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter())
    }

    /// Append a column, or replace the column with the same name in place
    ///
    /// Fails if the table already has columns and the new one differs in length.
    pub fn push_column<S: Into<String>>(&mut self, name: S, column: Column) -> Result<()> {
        let name = name.into();
        if self.width() > 0 && column.len() != self.height() {
            return Err(DatasetError::LengthMismatch {
                name,
                expected: self.height(),
                actual: column.len(),
            });
        }

        match self.position(&name) {
            Some(idx) => self.columns[idx] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }

        Ok(())
    }

    /// Builder variant of [`push_column`](Self::push_column)
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Result<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> SalesFrame {
        let rows = 0..n.min(self.height());
        SalesFrame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(rows.clone())).collect(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|x| x == name)
    }
}

impl fmt::Display for SalesFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "shape: ({}, {})", self.height(), self.width())?;
        writeln!(f, "{}", self.names.join("\t"))?;
        for row in 0..self.height() {
            let cells = self
                .columns
                .iter()
                .map(|c| c.get(row).map(|x| x.to_string()).unwrap_or_default())
                .collect::<Vec<_>>();
            writeln!(f, "{}", cells.join("\t"))?;
        }

        Ok(())
    }
}
