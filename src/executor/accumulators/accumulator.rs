use std::hash::Hash;

use indexmap::IndexMap;

use crate::database::Row;

/// Per-group reduce state.
///
/// The grouping pass creates one accumulator per distinct key, feeds it every
/// row of that group with `update`, then reads the result with `finalize`.
pub trait Accumulator {
    type Output;

    /// Fold one row of the group into the running state.
    fn update(&mut self, row: &Row);

    fn finalize(&self) -> Self::Output;
}

/// Group `rows` by `key_of` and reduce each group with a fresh accumulator.
///
/// Rows for which `key_of` returns `None` are skipped. Groups come back in
/// first-encounter order, which is what makes later stable sorts break ties
/// by input order.
pub fn group_by<K, A, F, M>(rows: &[Row], key_of: F, make: M) -> IndexMap<K, A::Output>
where
    K: Hash + Eq,
    A: Accumulator,
    F: Fn(&Row) -> Option<K>,
    M: Fn() -> A,
{
    let mut groups: IndexMap<K, A> = IndexMap::new();
    for row in rows {
        let Some(key) = key_of(row) else { continue };
        groups.entry(key).or_insert_with(&make).update(row);
    }
    groups.into_iter().map(|(k, acc)| (k, acc.finalize())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::accumulators::CountAcc;
    use crate::fixtures::rows;
    use serde_json::json;

    #[test]
    fn group_by_keeps_first_encounter_order_and_skips_missing_keys() {
        let data = rows(json!([
            { "k": "b" }, { "k": "a" }, {}, { "k": "b" }, { "k": "c" }
        ]));
        let groups = group_by(&data, |r| r.get_str("k").map(str::to_string), CountAcc::default);

        let got: Vec<_> = groups.into_iter().collect();
        assert_eq!(got, vec![("b".to_string(), 2), ("a".to_string(), 1), ("c".to_string(), 1)]);
    }
}
