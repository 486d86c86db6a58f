pub mod helpers;
pub mod accumulators;

pub mod join;
pub use join::*;

pub mod transform;
pub use transform::*;

pub mod filter;
pub use filter::*;

pub mod aggregate;
pub use aggregate::*;

pub mod pipeline;
pub use pipeline::*;
