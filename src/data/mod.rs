//! Data module - CSV loading, cleaning and catalog resolution

pub mod catalog;
pub mod cleaner;
pub mod loader;

pub use catalog::{
    column_name, resolve, resolved_names, Crop, Metric, ResolvedColumn, DISTRICT_COLUMN,
    STATE_COLUMN, YEAR_COLUMN,
};
pub use cleaner::fill_missing_with_zero;
pub use loader::{read_csv_bytes, read_csv_path, DataSourceError};
