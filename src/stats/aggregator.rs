//! Grouped Aggregation Module
//! Grouped means and sums over the cleaned district table.

use polars::prelude::*;
use thiserror::Error;

use crate::data::YEAR_COLUMN;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Sort column '{0}' is not among the aggregated columns")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

fn descending_stable() -> SortMultipleOptions {
    SortMultipleOptions::default()
        .with_order_descending(true)
        .with_maintain_order(true)
}

/// Mean of each column per year, years ascending.
///
/// Zero-filled cells participate in the means; a district that never grew a
/// crop drags that crop's average toward zero. That is the published
/// behavior of these tables, kept as-is.
pub fn yearly_mean(df: &DataFrame, columns: &[String]) -> Result<DataFrame, AggregateError> {
    let aggs: Vec<Expr> = columns.iter().map(|c| col(c.as_str()).mean()).collect();
    let out = df
        .clone()
        .lazy()
        .group_by_stable([col(YEAR_COLUMN)])
        .agg(aggs)
        .sort([YEAR_COLUMN], SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}

/// Mean of each column per group, sorted descending by `sort_column` and
/// truncated to the `top_n` highest groups.
///
/// `sort_column` must be one of `columns`; asking to rank by a column that
/// was never aggregated is a caller bug surfaced as
/// [`AggregateError::MissingColumn`]. Groups tied on the sort key keep their
/// first-seen row order.
pub fn groupwise_mean(
    df: &DataFrame,
    columns: &[String],
    group_keys: &[&str],
    sort_column: &str,
    top_n: usize,
) -> Result<DataFrame, AggregateError> {
    if !columns.iter().any(|c| c == sort_column) {
        return Err(AggregateError::MissingColumn(sort_column.to_string()));
    }

    let keys: Vec<Expr> = group_keys.iter().map(|k| col(*k)).collect();
    let aggs: Vec<Expr> = columns.iter().map(|c| col(c.as_str()).mean()).collect();
    let out = df
        .clone()
        .lazy()
        .group_by_stable(keys)
        .agg(aggs)
        .sort([sort_column], descending_stable())
        .limit(top_n as IdxSize)
        .collect()?;
    Ok(out)
}

/// Sum of each column per year, years ascending.
pub fn yearly_sum(df: &DataFrame, columns: &[String]) -> Result<DataFrame, AggregateError> {
    let aggs: Vec<Expr> = columns.iter().map(|c| col(c.as_str()).sum()).collect();
    let out = df
        .clone()
        .lazy()
        .group_by_stable([col(YEAR_COLUMN)])
        .agg(aggs)
        .sort([YEAR_COLUMN], SortMultipleOptions::default())
        .collect()?;
    Ok(out)
}

/// Sum of one column per group, descending, truncated to the `top_n`
/// largest groups. Ties keep first-seen order.
pub fn groupwise_sum_top(
    df: &DataFrame,
    value_column: &str,
    group_keys: &[&str],
    top_n: usize,
) -> Result<DataFrame, AggregateError> {
    let keys: Vec<Expr> = group_keys.iter().map(|k| col(*k)).collect();
    let out = df
        .clone()
        .lazy()
        .group_by_stable(keys)
        .agg([col(value_column).sum()])
        .sort([value_column], descending_stable())
        .limit(top_n as IdxSize)
        .collect()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fill_missing_with_zero, resolve, resolved_names, Metric, DISTRICT_COLUMN, STATE_COLUMN};

    const RICE_YIELD: &str = "RICE YIELD (Kg per ha)";

    #[test]
    fn yearly_mean_averages_zero_filled_cells() {
        // Two years of rice yield with one absent cell; wheat never appears,
        // so the resolver leaves it out entirely.
        let raw = df!(
            "Year" => [1966i64, 1966, 1967, 1967],
            RICE_YIELD => [Some(2.0f64), None, Some(3.0), Some(5.0)],
        )
        .unwrap();

        let cleaned = fill_missing_with_zero(&raw).unwrap();
        let resolved = resolve(&cleaned, Metric::Yield);
        assert_eq!(resolved.len(), 1);

        let out = yearly_mean(&cleaned, &resolved_names(&resolved)).unwrap();
        assert_eq!(out.height(), 2);

        let years = out.column("Year").unwrap().i64().unwrap();
        assert_eq!(years.get(0), Some(1966));
        assert_eq!(years.get(1), Some(1967));

        let means = out.column(RICE_YIELD).unwrap().f64().unwrap();
        // 1966: (2.0 + 0.0) / 2, the filled cell counts.
        assert_eq!(means.get(0), Some(1.0));
        assert_eq!(means.get(1), Some(4.0));
    }

    #[test]
    fn yearly_mean_orders_years_ascending() {
        let df = df!(
            "Year" => [1970i64, 1966, 1968],
            RICE_YIELD => [1.0f64, 2.0, 3.0],
        )
        .unwrap();

        let out = yearly_mean(&df, &[RICE_YIELD.to_string()]).unwrap();
        let years: Vec<i64> = out
            .column("Year")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(years, vec![1966, 1968, 1970]);
    }

    #[test]
    fn groupwise_mean_sorts_desc_and_truncates() {
        let df = df!(
            STATE_COLUMN => ["Bihar", "Bihar", "Punjab", "Punjab", "Kerala"],
            RICE_YIELD => [1.0f64, 3.0, 10.0, 12.0, 5.0],
        )
        .unwrap();

        let out = groupwise_mean(
            &df,
            &[RICE_YIELD.to_string()],
            &[STATE_COLUMN],
            RICE_YIELD,
            2,
        )
        .unwrap();

        assert_eq!(out.height(), 2);
        let states = out.column(STATE_COLUMN).unwrap();
        let states = states.str().unwrap();
        assert_eq!(states.get(0), Some("Punjab"));
        assert_eq!(states.get(1), Some("Kerala"));
    }

    #[test]
    fn groupwise_mean_keeps_all_groups_when_top_n_is_large() {
        let df = df!(
            STATE_COLUMN => ["Bihar", "Punjab"],
            RICE_YIELD => [1.0f64, 2.0],
        )
        .unwrap();

        let out = groupwise_mean(
            &df,
            &[RICE_YIELD.to_string()],
            &[STATE_COLUMN],
            RICE_YIELD,
            10,
        )
        .unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn groupwise_mean_rejects_unknown_sort_column() {
        let df = df!(
            STATE_COLUMN => ["Bihar"],
            RICE_YIELD => [1.0f64],
        )
        .unwrap();

        let err = groupwise_mean(
            &df,
            &[RICE_YIELD.to_string()],
            &[STATE_COLUMN],
            "WHEAT YIELD (Kg per ha)",
            5,
        )
        .unwrap_err();

        assert!(matches!(err, AggregateError::MissingColumn(ref c) if c.contains("WHEAT")));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let df = df!(
            STATE_COLUMN => ["Madhya Pradesh", "Assam", "Odisha"],
            RICE_YIELD => [4.0f64, 4.0, 4.0],
        )
        .unwrap();

        let out = groupwise_mean(
            &df,
            &[RICE_YIELD.to_string()],
            &[STATE_COLUMN],
            RICE_YIELD,
            3,
        )
        .unwrap();

        let states: Vec<String> = out
            .column(STATE_COLUMN)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .flatten()
            .map(String::from)
            .collect();
        assert_eq!(states, vec!["Madhya Pradesh", "Assam", "Odisha"]);
    }

    #[test]
    fn empty_table_aggregates_to_empty() {
        let df = df!(
            "Year" => Vec::<i64>::new(),
            RICE_YIELD => Vec::<f64>::new(),
        )
        .unwrap();

        let out = yearly_mean(&df, &[RICE_YIELD.to_string()]).unwrap();
        assert_eq!(out.height(), 0);

        let top = groupwise_sum_top(&df, RICE_YIELD, &["Year"], 5).unwrap();
        assert_eq!(top.height(), 0);
    }

    #[test]
    fn yearly_sum_totals_per_year() {
        let df = df!(
            "Year" => [1966i64, 1966, 1967],
            "RICE AREA (1000 ha)" => [1.5f64, 2.5, 4.0],
        )
        .unwrap();

        let out = yearly_sum(&df, &["RICE AREA (1000 ha)".to_string()]).unwrap();
        let sums = out.column("RICE AREA (1000 ha)").unwrap();
        let sums = sums.f64().unwrap();
        assert_eq!(sums.get(0), Some(4.0));
        assert_eq!(sums.get(1), Some(4.0));
    }

    #[test]
    fn same_district_name_in_two_states_stays_separate() {
        let df = df!(
            STATE_COLUMN => ["Bihar", "Bihar", "Jharkhand"],
            DISTRICT_COLUMN => ["Aurangabad", "Aurangabad", "Aurangabad"],
            "RICE AREA (1000 ha)" => [2.0f64, 3.0, 4.0],
        )
        .unwrap();

        let out = groupwise_sum_top(
            &df,
            "RICE AREA (1000 ha)",
            &[STATE_COLUMN, DISTRICT_COLUMN],
            5,
        )
        .unwrap();

        assert_eq!(out.height(), 2);
        let sums = out.column("RICE AREA (1000 ha)").unwrap();
        let sums = sums.f64().unwrap();
        assert_eq!(sums.get(0), Some(5.0));
        assert_eq!(sums.get(1), Some(4.0));
    }
}
