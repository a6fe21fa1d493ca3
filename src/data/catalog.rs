//! Crop Catalog Module
//! Fixed crop and metric descriptors, and resolution of the metric columns
//! actually present in a loaded table.

use polars::prelude::*;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Year column of the district table.
pub const YEAR_COLUMN: &str = "Year";
/// State column of the district table.
pub const STATE_COLUMN: &str = "State Name";
/// District column of the district table.
pub const DISTRICT_COLUMN: &str = "Dist Name";

/// Crops tracked by the dataset, in catalog order.
///
/// The order is load-bearing: resolved columns, chart series and legends all
/// follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crop {
    Rice,
    Wheat,
    Maize,
    Sorghum,
    PearlMillet,
    Chickpea,
    Pigeonpea,
    Groundnut,
    Cotton,
}

impl Crop {
    pub const ALL: [Crop; 9] = [
        Crop::Rice,
        Crop::Wheat,
        Crop::Maize,
        Crop::Sorghum,
        Crop::PearlMillet,
        Crop::Chickpea,
        Crop::Pigeonpea,
        Crop::Groundnut,
        Crop::Cotton,
    ];

    /// Dataset spelling of the crop, as used in column headers.
    pub fn label(&self) -> &'static str {
        match self {
            Crop::Rice => "RICE",
            Crop::Wheat => "WHEAT",
            Crop::Maize => "MAIZE",
            Crop::Sorghum => "SORGHUM",
            Crop::PearlMillet => "PEARL MILLET",
            Crop::Chickpea => "CHICKPEA",
            Crop::Pigeonpea => "PIGEONPEA",
            Crop::Groundnut => "GROUNDNUT",
            Crop::Cotton => "COTTON",
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone)]
#[error("Unknown crop '{0}', expected one of RICE, WHEAT, MAIZE, SORGHUM, PEARL MILLET, CHICKPEA, PIGEONPEA, GROUNDNUT, COTTON")]
pub struct ParseCropError(String);

impl FromStr for Crop {
    type Err = ParseCropError;

    /// Case-insensitive; hyphens and underscores read as spaces, so
    /// `pearl-millet` and `PEARL MILLET` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .to_uppercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        Crop::ALL
            .iter()
            .copied()
            .find(|crop| crop.label() == normalized)
            .ok_or_else(|| ParseCropError(s.to_string()))
    }
}

/// Per-crop measurements recorded in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Yield,
    Area,
    Production,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Yield => "YIELD",
            Metric::Area => "AREA",
            Metric::Production => "PRODUCTION",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Yield => "Kg per ha",
            Metric::Area => "1000 ha",
            Metric::Production => "1000 tons",
        }
    }
}

/// Column header for a crop/metric pair, e.g. `RICE YIELD (Kg per ha)`.
pub fn column_name(crop: Crop, metric: Metric) -> String {
    format!("{} {} ({})", crop.label(), metric.label(), metric.unit())
}

/// A catalog column that exists in the loaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub crop: Crop,
    pub name: String,
}

/// Resolve the catalog against a table for one metric.
///
/// Returns the crop/column pairs present in the table, in catalog order.
/// Crops without a matching column are skipped without error; tables from
/// regions that never grew a crop simply produce shorter chart series.
pub fn resolve(df: &DataFrame, metric: Metric) -> Vec<ResolvedColumn> {
    Crop::ALL
        .iter()
        .filter_map(|&crop| {
            let name = column_name(crop, metric);
            df.column(&name)
                .is_ok()
                .then(|| ResolvedColumn { crop, name })
        })
        .collect()
}

/// Column names only, for feeding straight into aggregations.
pub fn resolved_names(resolved: &[ResolvedColumn]) -> Vec<String> {
    resolved.iter().map(|rc| rc.name.clone()).collect()
}
