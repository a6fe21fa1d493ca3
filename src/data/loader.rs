//! CSV Data Loading Module
//! Reads district crop tables from disk or memory using Polars.

use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: PolarsError },
    #[error("Failed to parse CSV data: {0}")]
    Parse(#[from] PolarsError),
}

/// Load a CSV file from disk.
///
/// Schema is inferred from up to the first 10,000 rows; cells that fail to
/// parse under the inferred schema become nulls instead of aborting the read.
pub fn read_csv_path(path: &Path) -> Result<DataFrame, DataSourceError> {
    LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(|source| DataSourceError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse an in-memory CSV byte buffer with the same inference settings as
/// [`read_csv_path`].
pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame, DataSourceError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(df)
}

/// Whether a dtype counts as numeric for summaries and chart extraction.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Names of all numeric columns, in table order.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}
