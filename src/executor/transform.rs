use indexmap::IndexSet;
use serde_json::Value;

use crate::{database::Row, executor::helpers::Helpers};

pub const PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";

/// Rename `from` to `to` on every row, moving the value to the end of the
/// row. Rows without `from` pass through untouched.
pub fn rename_column(rows: &[Row], from: &str, to: &str) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if let Some(value) = row.remove(from) {
                row.insert(to, value);
            }
            row
        })
        .collect()
}

/// Rewrite the purchase timestamp as `YYYY-MM-DD 00:00:00`.
///
/// Values that do not parse are left as they are; the day aggregation drops
/// them later and the range filter compares whatever prefix they have.
pub fn normalize_purchase_date(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter()
        .map(|mut row| {
            let day = row.get_str(PURCHASE_TIMESTAMP).and_then(Helpers::parse_day);
            if let Some(day) = day {
                row.insert(PURCHASE_TIMESTAMP, Value::String(Helpers::midnight_string(day)));
            }
            row
        })
        .collect()
}

/// Project every row onto `columns`, in the order given. Columns a row does
/// not have are skipped rather than null-filled.
pub fn select_columns<S: AsRef<str>>(rows: &[Row], columns: &[S]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut out = Row::new();
            for col in columns {
                let col = col.as_ref();
                if let Some(value) = row.get(col) {
                    out.insert(col, value.clone());
                }
            }
            out
        })
        .collect()
}

/// Distinct non-empty string values of `column`, in first-encounter order.
pub fn distinct_values(rows: &[Row], column: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.non_empty(column))
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
