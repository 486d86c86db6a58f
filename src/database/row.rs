use serde::Serialize;
use serde_json::{Map, Value};

/// One record of a table: column name -> value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(pub Map<String, Value>);

impl Row {
    pub fn new() -> Self { Self(Map::new()) }

    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

    /// String view of a column. Loaded values are always strings; numbers
    /// and booleans produced by transforms are not coerced here.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Like [`Row::get_str`], but treats an empty string as absent.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|s| !s.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool { self.0.contains_key(key) }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> { self.0.shift_remove(key) }

    /// Spread-merge `other` on top of `self`; `other` wins on name collision.
    pub fn merged(&self, other: &Row) -> Row {
        let mut out = self.0.clone();
        for (k, v) in &other.0 {
            out.insert(k.clone(), v.clone());
        }
        Row(out)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), Value::String(v.into()))).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merged_right_side_wins_and_keeps_left_position() {
        let left: Row = [("order_id", "o1"), ("status", "delivered")].into_iter().collect();
        let right: Row = [("status", "shipped"), ("payment_type", "boleto")].into_iter().collect();

        let merged = left.merged(&right);
        let keys: Vec<_> = merged.0.keys().cloned().collect();
        assert_eq!(keys, vec!["order_id", "status", "payment_type"]);
        assert_eq!(merged.get_str("status"), Some("shipped"));
    }

    #[test]
    fn non_empty_ignores_blank_and_non_string_values() {
        let mut row = Row::new();
        row.insert("city", json!(""));
        row.insert("value", json!(3));
        assert_eq!(row.non_empty("city"), None);
        assert_eq!(row.get_str("value"), None);
        assert_eq!(row.non_empty("missing"), None);
    }
}
