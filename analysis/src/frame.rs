//! Small conveniences over polars frames for the wide-table stages.

use polars::prelude::*;

use crate::error::Result;

pub fn float_column(name: &str, values: Vec<f64>) -> Column {
    Column::new(name.into(), values)
}

pub fn text_column(name: &str, values: Vec<String>) -> Column {
    Column::new(name.into(), values)
}

/// Values of a numeric column. Nulls read as NaN.
pub fn floats(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = frame.column(name)?.as_materialized_series().f64()?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Values of a text column. Nulls read as empty strings.
pub fn texts(frame: &DataFrame, name: &str) -> Result<Vec<String>> {
    let values = frame.column(name)?.as_materialized_series().str()?;
    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or_default().to_owned())
        .collect())
}

pub fn names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect()
}

pub fn mask(values: &[bool]) -> BooleanChunked {
    BooleanChunked::new("mask".into(), values)
}

/// Stacks frames with identical schemas, in order.
pub fn concat(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut frames = frames.into_iter();
    let Some(mut stacked) = frames.next() else {
        return Ok(DataFrame::empty());
    };
    for frame in frames {
        stacked.vstack_mut(&frame)?;
    }
    Ok(stacked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            float_column("tick", vec![3.0, 1.0, 2.0, 1.0]),
            text_column(
                "name",
                vec!["c".to_owned(), "a".to_owned(), "b".to_owned(), "a2".to_owned()],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn stable_sort_on_tick() {
        let sorted = sample()
            .sort(["tick"], SortMultipleOptions::new().with_maintain_order(true))
            .unwrap();
        assert_eq!(vec!["a", "a2", "b", "c"], texts(&sorted, "name").unwrap());
    }

    #[test]
    fn concat_keeps_order() {
        let stacked = concat(vec![sample(), sample()]).unwrap();
        assert_eq!(
            vec![3.0, 1.0, 2.0, 1.0, 3.0, 1.0, 2.0, 1.0],
            floats(&stacked, "tick").unwrap()
        );
        assert_eq!(0, concat(Vec::new()).unwrap().height());
    }

    #[test]
    fn filter_by_mask() {
        let kept = sample().filter(&mask(&[true, false, false, true])).unwrap();
        assert_eq!(vec!["c", "a2"], texts(&kept, "name").unwrap());
    }
}
