//! Missing Value Cleaning Module
//! Replaces every absent cell with a zero sentinel before aggregation.

use polars::prelude::*;

/// Fill all absent cells with zero, keeping each column's dtype.
///
/// Integer columns fill nulls with `0`, float columns fill both NaN and null
/// with `0.0`, string columns fill nulls with `"0"`. Columns of any other
/// dtype pass through unchanged. The sweep runs once per loaded table, before
/// any aggregation; downstream code may assume the result has no nulls in
/// these dtypes.
pub fn fill_missing_with_zero(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut exprs: Vec<Expr> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let name = column.name().as_str();
        let dtype = column.dtype();

        let expr = if matches!(dtype, DataType::Float32 | DataType::Float64) {
            col(name)
                .fill_nan(lit(0.0).cast(dtype.clone()))
                .fill_null(lit(0.0).cast(dtype.clone()))
        } else if matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        ) {
            col(name).fill_null(lit(0).cast(dtype.clone()))
        } else if matches!(dtype, DataType::String) {
            col(name).fill_null(lit("0"))
        } else {
            continue;
        };

        exprs.push(expr);
    }

    df.clone().lazy().with_columns(exprs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_frame() -> DataFrame {
        df!(
            "Year" => [Some(1966i64), None, Some(1968)],
            "State Name" => [Some("Bihar"), None, Some("Punjab")],
            "RICE AREA (1000 ha)" => [Some(10.5f64), None, Some(f64::NAN)],
        )
        .unwrap()
    }

    #[test]
    fn fills_nulls_and_nans_with_zero() {
        let cleaned = fill_missing_with_zero(&sparse_frame()).unwrap();

        let year = cleaned.column("Year").unwrap();
        assert_eq!(year.null_count(), 0);
        assert_eq!(year.i64().unwrap().get(1), Some(0));

        let state = cleaned.column("State Name").unwrap();
        assert_eq!(state.null_count(), 0);
        assert_eq!(state.str().unwrap().get(1), Some("0"));

        let area = cleaned.column("RICE AREA (1000 ha)").unwrap();
        assert_eq!(area.null_count(), 0);
        assert_eq!(area.f64().unwrap().get(1), Some(0.0));
        assert_eq!(area.f64().unwrap().get(2), Some(0.0));
    }

    #[test]
    fn preserves_column_dtypes() {
        let cleaned = fill_missing_with_zero(&sparse_frame()).unwrap();
        assert_eq!(cleaned.column("Year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(
            cleaned.column("State Name").unwrap().dtype(),
            &DataType::String
        );
        assert_eq!(
            cleaned.column("RICE AREA (1000 ha)").unwrap().dtype(),
            &DataType::Float64
        );
    }

    #[test]
    fn leaves_present_values_untouched() {
        let cleaned = fill_missing_with_zero(&sparse_frame()).unwrap();
        let area = cleaned.column("RICE AREA (1000 ha)").unwrap();
        assert_eq!(area.f64().unwrap().get(0), Some(10.5));
        assert_eq!(
            cleaned
                .column("State Name")
                .unwrap()
                .str()
                .unwrap()
                .get(2),
            Some("Punjab")
        );
    }

    #[test]
    fn cleaning_twice_changes_nothing() {
        let once = fill_missing_with_zero(&sparse_frame()).unwrap();
        let twice = fill_missing_with_zero(&once).unwrap();
        assert!(once.equals(&twice));
    }
}
