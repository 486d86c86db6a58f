use std::{borrow::Cow, collections::HashMap};

use serde_json::Value;

use crate::database::{JoinStrategy, Row};

/// Raw string form of a join key. Missing and null keys never match.
pub(crate) fn key_of<'a>(row: &'a Row, key: &str) -> Option<Cow<'a, str>> {
    match row.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

/// Inner join keeping at most one right row per key (the last one seen).
///
/// Output preserves `left` order; each output row is the left row with the
/// matching right row spread on top of it.
pub fn inner_join(left: &[Row], right: &[Row], key: &str) -> Vec<Row> {
    let mut index: HashMap<Cow<'_, str>, &Row> = HashMap::with_capacity(right.len());
    for r in right {
        if let Some(k) = key_of(r, key) {
            index.insert(k, r);
        }
    }

    left.iter()
        .filter_map(|l| {
            let k = key_of(l, key)?;
            index.get(k.as_ref()).map(|r| l.merged(r))
        })
        .collect()
}

/// Inner join emitting one row per (left, matching right) pair: left order
/// first, then right order within one left row.
pub fn inner_join_fan_out(left: &[Row], right: &[Row], key: &str) -> Vec<Row> {
    let mut index: HashMap<Cow<'_, str>, Vec<&Row>> = HashMap::with_capacity(right.len());
    for r in right {
        if let Some(k) = key_of(r, key) {
            index.entry(k).or_default().push(r);
        }
    }

    let mut out = Vec::with_capacity(left.len());
    for l in left {
        let Some(k) = key_of(l, key) else { continue };
        if let Some(matches) = index.get(k.as_ref()) {
            out.extend(matches.iter().map(|r| l.merged(r)));
        }
    }
    out
}

pub fn join_with(strategy: JoinStrategy, left: &[Row], right: &[Row], key: &str) -> Vec<Row> {
    match strategy {
        JoinStrategy::LastMatch => inner_join(left, right, key),
        JoinStrategy::FanOut => inner_join_fan_out(left, right, key),
    }
}
