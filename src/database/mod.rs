pub mod row;
pub use row::*;

pub mod table;
pub use table::*;

pub mod config;
pub use config::*;

pub mod loader;

pub mod dataset;
pub use dataset::*;
