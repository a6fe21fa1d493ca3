//! Statistics module - aggregations, correlations and dataset summaries

pub mod aggregator;
pub mod correlation;
pub mod summary;

pub use aggregator::{
    groupwise_mean, groupwise_sum_top, yearly_mean, yearly_sum, AggregateError,
};
pub use correlation::{correlation_matrix, CorrelationMatrix, LabeledSeries};
pub use summary::{describe, ColumnSummary, DatasetSummary};
