//! AgriDash - district-level crop statistics
//!
//! The pipeline reads a district-year crop production CSV, fills absent
//! cells with zero and builds a fixed sequence of six charts. The
//! `agridash` binary shows them in an interactive window; the
//! `agridash-report` binary writes them to PNG files.

pub mod charts;
pub mod data;
pub mod gui;
pub mod report;
pub mod stats;
