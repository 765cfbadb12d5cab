//! Reading and writing sales tables as CSV
//!
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::debug;

use crate::error::{DatasetError, Result};
use crate::frame::{Column, SalesFrame};

/// Read a sales table from the CSV file at `path`
///
/// The file needs a header row and `,` as delimiter. Every column is read as text, in file order.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<SalesFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let frame = read_csv(file)?;
    debug!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "read sales table"
    );

    Ok(frame)
}

/// Read a sales table from any CSV source
///
/// Surrounding whitespace is trimmed from headers and fields. Rows with a different number of
/// fields than the header are rejected.
pub fn read_csv<R: Read>(csv: R) -> Result<SalesFrame> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(Trim::All)
        .from_reader(csv);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DatasetError::MissingHeader);
    }

    let mut columns = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    SalesFrame::from_columns(
        headers
            .iter()
            .zip(columns)
            .map(|(name, values)| (name, Column::Text(values)))
            .collect(),
    )
}

/// Write a sales table as CSV with a header row
pub fn write_csv<W: Write>(frame: &SalesFrame, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b',').from_writer(out);

    writer.write_record(frame.column_names())?;
    for row in 0..frame.height() {
        let record = frame
            .iter()
            .map(|(_, column)| column.get(row).map(|x| x.to_string()).unwrap_or_default());
        writer.write_record(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;

    Ok(())
}
