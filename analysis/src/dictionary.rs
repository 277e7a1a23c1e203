//! Per-column value ranges of the final frame.

use polars::prelude::*;

use crate::canonical::{MATCH_ID, NUMERICAL_MATCH_ID};
use crate::error::Result;
use crate::frame::{float_column, text_column};

pub fn is_dictionary_column(name: &str) -> bool {
    !name.contains("_name") && name != MATCH_ID && name != NUMERICAL_MATCH_ID
}

/// A `column, min, max` frame over every numeric column. Columns of an empty
/// frame get NaN bounds.
#[tracing::instrument(skip_all, fields(rows = frame.height()))]
pub fn build(frame: &DataFrame) -> Result<DataFrame> {
    let mut names = Vec::new();
    let mut mins = Vec::new();
    let mut maxs = Vec::new();

    for column in frame.get_columns() {
        if column.dtype() != &DataType::Float64 || !is_dictionary_column(column.name()) {
            continue;
        }
        let values = column.as_materialized_series().f64()?;
        names.push(column.name().to_string());
        mins.push(values.min().unwrap_or(f64::NAN));
        maxs.push(values.max().unwrap_or(f64::NAN));
    }

    let dictionary = DataFrame::new(vec![
        text_column("column", names),
        float_column("min", mins),
        float_column("max", maxs),
    ])?;
    Ok(dictionary)
}
