use crate::{database::Row, executor::{accumulators::Accumulator, helpers::Helpers}};

/// Sums one column of a group, coercing each cell with
/// [`Helpers::coerce_f64`]; cells that are not numbers add zero.
#[derive(Debug, Clone)]
pub struct SumAcc {
    field: String,
    total: f64,
}

impl SumAcc {
    pub fn new(field: &str) -> Self {
        Self { field: field.to_string(), total: 0.0 }
    }
}

impl Accumulator for SumAcc {
    type Output = f64;

    fn update(&mut self, row: &Row) {
        self.total += Helpers::coerce_f64(row.get(&self.field));
    }

    fn finalize(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::rows;
    use serde_json::json;

    #[test]
    fn sum_skips_non_numeric_values() {
        let data = rows(json!([
            { "payment_value": "10.5" },
            { "payment_value": "abc" },
            { "payment_value": "" },
            {},
            { "payment_value": 2 }
        ]));
        let mut acc = SumAcc::new("payment_value");
        for row in &data {
            acc.update(row);
        }
        assert_eq!(acc.finalize(), 12.5);
    }
}
