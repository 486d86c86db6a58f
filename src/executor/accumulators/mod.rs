pub mod accumulator;
pub use accumulator::*;

pub mod count_acc;
pub use count_acc::*;

pub mod sum_acc;
pub use sum_acc::*;
