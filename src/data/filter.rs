use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};

use super::model::Column;

// ---------------------------------------------------------------------------
// Joint row drop
// ---------------------------------------------------------------------------

/// A column seen only through its missing-value mask.
pub(crate) trait Cells {
    fn row_count(&self) -> usize;
    fn is_missing(&self, row: usize) -> bool;
}

impl<T> Cells for Column<T> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn is_missing(&self, row: usize) -> bool {
        self.get(row).map_or(true, Option::is_none)
    }
}

/// Return indices of rows that are present in every column.
///
/// The drop is joint: a row missing in any single column is excluded from
/// all of them, so every projected column keeps the same rows.
pub(crate) fn complete_rows(columns: &[&dyn Cells]) -> Vec<usize> {
    let rows = columns.iter().map(|c| c.row_count()).max().unwrap_or(0);
    (0..rows)
        .filter(|&row| columns.iter().all(|c| !c.is_missing(row)))
        .collect()
}

// ---------------------------------------------------------------------------
// Projection helpers (Arrow arrays over the kept rows)
// ---------------------------------------------------------------------------

pub(crate) fn float_array(column: &[Option<f64>], rows: &[usize]) -> ArrayRef {
    Arc::new(Float64Array::from(
        rows.iter().map(|&row| column[row]).collect::<Vec<Option<f64>>>(),
    ))
}

pub(crate) fn text_array<'a, T, F>(column: &'a [Option<T>], rows: &[usize], as_str: F) -> ArrayRef
where
    F: Fn(&'a T) -> &'a str,
{
    Arc::new(StringArray::from(
        rows.iter()
            .map(|&row| column[row].as_ref().map(&as_str))
            .collect::<Vec<Option<&str>>>(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;

    #[test]
    fn drop_is_joint_across_columns() {
        let a: Column<f64> = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let b: Column<String> = vec![Some("x".into()), Some("y".into()), None, Some("w".into())];
        assert_eq!(complete_rows(&[&a, &b]), vec![0, 3]);
    }

    #[test]
    fn complete_table_keeps_every_row() {
        let a: Column<f64> = vec![Some(1.0), Some(2.0)];
        assert_eq!(complete_rows(&[&a, &a]), vec![0, 1]);
        assert!(complete_rows(&[]).is_empty());
    }

    #[test]
    fn projections_follow_the_kept_rows() {
        let values: Column<f64> = vec![Some(1.0), Some(2.0), Some(3.0)];
        let names: Column<String> = vec![Some("a".into()), Some("b".into()), Some("c".into())];

        let floats = float_array(&values, &[0, 2]);
        let texts = text_array(&names, &[2], |s| s.as_str());

        assert_eq!(floats.len(), 2);
        assert_eq!(floats.null_count(), 0);
        assert_eq!(texts.len(), 1);
    }
}
