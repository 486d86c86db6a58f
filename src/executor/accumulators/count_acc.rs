use crate::{database::Row, executor::accumulators::Accumulator};

/// Counts the rows of a group.
#[derive(Debug, Default, Clone)]
pub struct CountAcc {
    cnt: u64,
}

impl Accumulator for CountAcc {
    type Output = u64;

    fn update(&mut self, _row: &Row) {
        self.cnt += 1;
    }

    fn finalize(&self) -> u64 {
        self.cnt
    }
}
