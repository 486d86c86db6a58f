use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{database::Row, executor::transform::PURCHASE_TIMESTAMP};

pub const CATEGORY_FIELD: &str = "product_category_name";
pub const DATE_RANGE_START: &str = "date_range_start";
pub const DATE_RANGE_END: &str = "date_range_end";
/// Category value meaning "every category".
pub const ALL: &str = "all";

static DATE_BOUND: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// `true` when `s` looks like a `YYYY-MM-DD` range bound.
pub fn is_date_bound(s: &str) -> bool {
    DATE_BOUND.is_match(s)
}

/// The active cross-filter constraints: field name -> exact value.
///
/// An empty value (or `"all"` for the category) means "no constraint". The
/// state is a value: every change produces a new state and leaves the old
/// one untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    fields: IndexMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self { Self::default() }

    /// The state the dashboard starts from: every category, nothing selected.
    pub fn initial() -> Self {
        Self::new()
            .with(CATEGORY_FIELD, ALL)
            .with(DATE_RANGE_START, "")
            .with(DATE_RANGE_END, "")
            .with("geolocation_city", "")
            .with("customer_state", "")
            .with("payment_type", "")
            .with("seller_state", "")
    }

    /// Copy of this state with `field` set to `value`.
    pub fn with(&self, field: &str, value: &str) -> Self {
        let mut next = self.clone();
        next.fields.insert(field.to_string(), value.to_string());
        next
    }

    /// Copy of this state with `field` back to unconstrained.
    pub fn cleared(&self, field: &str) -> Self {
        if field == CATEGORY_FIELD {
            self.with(field, ALL)
        } else {
            self.with(field, "")
        }
    }

    pub fn with_date_range(&self, start: &str, end: &str) -> Self {
        self.with(DATE_RANGE_START, start).with(DATE_RANGE_END, end)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Constraints that actually restrict rows.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, v)| !v.is_empty() && !(*k == CATEGORY_FIELD && *v == ALL))
    }

    fn bound(&self, field: &str) -> Option<String> {
        self.get(field).filter(|v| !v.is_empty()).map(|v| format!("{v} 00:00:00"))
    }
}

/// Purchase day of a row as `YYYY-MM-DD 00:00:00`, taken from the first ten
/// characters of the timestamp.
fn row_day(row: &Row) -> Option<String> {
    let ts = row.get_str(PURCHASE_TIMESTAMP)?;
    let prefix = match ts.char_indices().nth(10) {
        Some((idx, _)) => &ts[..idx],
        None => ts,
    };
    Some(format!("{prefix} 00:00:00"))
}

/// Compiled form of a [`FilterState`], so bounds are formatted once per call
/// instead of once per row.
struct Predicate<'a> {
    start: Option<String>,
    end: Option<String>,
    equals: Vec<(&'a str, &'a str)>,
}

impl<'a> Predicate<'a> {
    fn compile(filters: &'a FilterState) -> Self {
        let equals = filters.active()
            .filter(|(k, _)| *k != DATE_RANGE_START && *k != DATE_RANGE_END)
            .collect();
        Self {
            start: filters.bound(DATE_RANGE_START),
            end: filters.bound(DATE_RANGE_END),
            equals,
        }
    }

    fn matches(&self, row: &Row) -> bool {
        if self.start.is_some() || self.end.is_some() {
            let Some(day) = row_day(row) else { return false };
            if self.start.as_ref().is_some_and(|start| day < *start) {
                return false;
            }
            if self.end.as_ref().is_some_and(|end| day > *end) {
                return false;
            }
        }
        self.equals.iter().all(|(field, value)| row.get_str(field) == Some(*value))
    }
}

/// Keep the rows satisfying every active constraint of `filters`.
pub fn filter_rows(filters: &FilterState, data: &[Row]) -> Vec<Row> {
    if filters.is_empty() {
        return data.to_vec();
    }
    let predicate = Predicate::compile(filters);
    data.iter().filter(|row| predicate.matches(row)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{records, rows};
    use serde_json::json;

    fn order_ids(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.get_str("order_id").unwrap()).collect()
    }

    #[test]
    fn empty_state_returns_everything() {
        let data = records();
        assert_eq!(filter_rows(&FilterState::new(), &data), data);
    }

    #[test]
    fn initial_state_is_unconstrained() {
        let data = records();
        assert_eq!(filter_rows(&FilterState::initial(), &data), data);
        assert_eq!(FilterState::initial().active().count(), 0);
    }

    #[test]
    fn exact_match_fields_are_anded() {
        let state = FilterState::initial()
            .with("customer_state", "SP")
            .with("payment_type", "credit_card");
        assert_eq!(order_ids(&filter_rows(&state, &records())), vec!["o1", "o3"]);

        let state = state.with(CATEGORY_FIELD, "esporte_lazer");
        assert_eq!(order_ids(&filter_rows(&state, &records())), vec!["o3"]);
    }

    #[test]
    fn unknown_field_value_matches_nothing() {
        let state = FilterState::new().with("geolocation_city", "manaus");
        assert!(filter_rows(&state, &records()).is_empty());
    }

    #[test]
    fn date_range_is_inclusive() {
        let data = rows(json!([
            { "order_id": "a", "order_purchase_timestamp": "2016-12-31 23:59:59" },
            { "order_id": "b", "order_purchase_timestamp": "2017-01-01 00:00:00" },
            { "order_id": "c", "order_purchase_timestamp": "2017-01-31 18:30:00" },
            { "order_id": "d", "order_purchase_timestamp": "2017-02-01 00:00:00" }
        ]));
        let state = FilterState::new().with_date_range("2017-01-01", "2017-01-31");
        assert_eq!(order_ids(&filter_rows(&state, &data)), vec!["b", "c"]);
    }

    #[test]
    fn open_date_bounds() {
        let data = records();
        let from = FilterState::initial().with(DATE_RANGE_START, "2017-02-01");
        assert_eq!(order_ids(&filter_rows(&from, &data)), vec!["o3", "o5"]);

        let until = FilterState::initial().with(DATE_RANGE_END, "2017-01-05");
        assert_eq!(order_ids(&filter_rows(&until, &data)), vec!["o1", "o2"]);
    }

    #[test]
    fn rows_without_timestamp_fail_an_active_range() {
        let data = rows(json!([{ "order_id": "x" }]));
        let state = FilterState::new().with(DATE_RANGE_START, "2017-01-01");
        assert!(filter_rows(&state, &data).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let data = records();
        let state = FilterState::initial()
            .with("customer_state", "SP")
            .with_date_range("2017-01-01", "2017-12-31");
        let once = filter_rows(&state, &data);
        let twice = filter_rows(&state, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn with_and_cleared_leave_the_original_untouched() {
        let base = FilterState::initial();
        let next = base.with("payment_type", "boleto");
        assert_eq!(base.get("payment_type"), Some(""));
        assert_eq!(next.get("payment_type"), Some("boleto"));
        assert_eq!(next.cleared("payment_type"), base);
        assert_eq!(base.with(CATEGORY_FIELD, "x").cleared(CATEGORY_FIELD).get(CATEGORY_FIELD), Some(ALL));
    }

    #[test]
    fn date_bound_shape() {
        assert!(is_date_bound("2017-01-31"));
        assert!(!is_date_bound("2017-1-31"));
        assert!(!is_date_bound("2017-01-31 00:00:00"));
    }
}
